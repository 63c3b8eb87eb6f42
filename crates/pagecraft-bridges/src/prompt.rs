// SPDX-License-Identifier: AGPL-3.0-or-later
//! Prompt composition
//!
//! The block schema shown to the model is rendered from the default content
//! resolver, so it always matches what the extractor accepts.

use pagecraft_core::defaults::default_content;
use pagecraft_core::instruction::ADD_BLOCK_ACTION;
use pagecraft_core::BlockKind;
use std::fmt::Write;

/// Asks for a fresh theme as bare JSON
pub const THEME_PROMPT: &str = r#"Generate a random, beautiful website color theme and font pairing.
Return JSON only:
{
    "colors": { "primary": "hex", "secondary": "hex", "text": "hex", "background": "hex", "accent": "hex" },
    "font": "font-family string",
    "borderRadius": "px value"
}"#;

/// One JSON example line per block type
pub fn block_schema() -> String {
    let mut out = String::new();
    for kind in BlockKind::ALL {
        let example = serde_json::to_string(&default_content(kind))
            .unwrap_or_else(|_| "{}".to_string());
        let _ = writeln!(out, "- {kind}: {example}");
    }
    out
}

pub fn builder_prompt(request: &str) -> String {
    format!(
        r#"You are an AI Web Builder Assistant.
The user wants to: {request}

To add a section to the page, include exactly one JSON object of this form in your reply:
{{ "action": "{ADD_BLOCK_ACTION}", "type": "<block type>", "content": {{ ... }} }}

Available block types, each with example content:
{schema}
Fill the content with copy that fits the request. Keep any surrounding text short.
If the user is not asking for a new section, answer concisely without JSON."#,
        schema = block_schema()
    )
}
