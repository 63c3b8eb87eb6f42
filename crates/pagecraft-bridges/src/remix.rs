// SPDX-License-Identifier: AGPL-3.0-or-later
//! Assistant-generated theme ("magic remix")

use pagecraft_core::{ThemePatch, ThemeStore};

use crate::assistant::{AssistantError, LanguageAssistant, Result};
use crate::prompt::THEME_PROMPT;

/// Parse a reply as a partial theme, ignoring Markdown code fences
pub fn parse_theme_patch(reply: &str) -> Result<ThemePatch> {
    let cleaned = reply.replace("```json", "").replace("```", "");
    serde_json::from_str(cleaned.trim()).map_err(|e| AssistantError::Malformed(e.to_string()))
}

/// Ask for a new theme and merge it. On failure the theme is left alone.
pub async fn remix_theme(assistant: &dyn LanguageAssistant, themes: &mut ThemeStore) -> Result<bool> {
    if !assistant.has_credential() {
        return Err(AssistantError::MissingApiKey);
    }

    let patch = match assistant.generate_content(THEME_PROMPT).await {
        Ok(reply) => parse_theme_patch(&reply),
        Err(e) => Err(e),
    }
    .map_err(|e| {
        tracing::error!(error = %e, "theme remix failed");
        e
    })?;

    let changed = themes.update(patch);
    tracing::info!(changed, "theme remixed");
    Ok(changed)
}
