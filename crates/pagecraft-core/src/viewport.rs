// SPDX-License-Identifier: AGPL-3.0-or-later
//! Preview device and zoom. Transient, never persisted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl DeviceType {
    /// Canvas width in CSS pixels; `None` means full width.
    pub const fn canvas_width(&self) -> Option<u32> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(768),
            Self::Mobile => Some(375),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "tablet" => Ok(Self::Tablet),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown device: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    device: DeviceType,
    zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            device: DeviceType::Desktop,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn device(&self) -> DeviceType {
        self.device
    }

    pub fn set_device(&mut self, device: DeviceType) {
        self.device = device;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor. Non-finite or non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !zoom.is_finite() || zoom <= 0.0 {
            tracing::debug!(zoom, "ignoring invalid zoom");
            return false;
        }
        self.zoom = zoom;
        true
    }
}
