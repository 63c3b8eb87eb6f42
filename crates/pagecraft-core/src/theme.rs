// SPDX-License-Identifier: AGPL-3.0-or-later
//! Site-wide theme consumed by rendering
//!
//! Independent of the document. Updated by shallow merge: each field present
//! in a [`ThemePatch`] replaces the whole field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#667eea".to_string(),
            secondary: "#764ba2".to_string(),
            accent: "#ed64a6".to_string(),
            background: "#ffffff".to_string(),
            text: "#2d3748".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteTheme {
    pub colors: ThemeColors,
    /// CSS font-family value
    pub font: String,
    /// CSS length, e.g. `8px`
    pub border_radius: String,
}

impl Default for SiteTheme {
    fn default() -> Self {
        Self {
            colors: ThemeColors::default(),
            font: "Inter, sans-serif".to_string(),
            border_radius: "8px".to_string(),
        }
    }
}

impl SiteTheme {
    /// Shallow merge; returns `true` if anything changed.
    pub fn apply(&mut self, patch: ThemePatch) -> bool {
        let before = self.clone();
        if let Some(colors) = patch.colors {
            self.colors = colors;
        }
        if let Some(font) = patch.font {
            self.font = font;
        }
        if let Some(border_radius) = patch.border_radius {
            self.border_radius = border_radius;
        }
        *self != before
    }

    /// Border radius in pixels, when expressed as `<n>px` or a bare number
    pub fn border_radius_px(&self) -> Option<u32> {
        let raw = self.border_radius.trim();
        raw.strip_suffix("px").unwrap_or(raw).trim().parse().ok()
    }
}

/// Partial theme. Missing color entries inside `colors` take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ThemeColors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
}

impl ThemePatch {
    pub fn font(font: impl Into<String>) -> Self {
        Self {
            font: Some(font.into()),
            ..Self::default()
        }
    }

    pub fn border_radius_px(px: u32) -> Self {
        Self {
            border_radius: Some(format!("{px}px")),
            ..Self::default()
        }
    }

    pub fn colors(colors: ThemeColors) -> Self {
        Self {
            colors: Some(colors),
            ..Self::default()
        }
    }
}
