// SPDX-License-Identifier: AGPL-3.0-or-later
//! Best-effort extraction of an `addBlock` instruction from assistant text
//!
//! This is not a parser. The candidate fragment is the span from the first
//! `{` to the last `}` in the text; it must be a JSON object of the form
//! `{ "action": "addBlock", "type": <block type>, "content": {...} }`.
//! Prose containing unrelated braces simply fails validation.

use serde::Deserialize;
use serde_json::Value;
use std::ops::Range;

use crate::block::{BlockContent, BlockKind};
use crate::traits::{BuilderError, Result};

/// The only action currently understood
pub const ADD_BLOCK_ACTION: &str = "addBlock";

/// A validated, ready-to-apply instruction
#[derive(Debug, Clone, PartialEq)]
pub struct AddBlockInstruction {
    pub content: BlockContent,
}

impl AddBlockInstruction {
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }
}

/// A found instruction and the text left once its fragment is cut out
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub instruction: AddBlockInstruction,
    pub remainder: String,
}

#[derive(Deserialize)]
struct RawInstruction {
    #[serde(default)]
    action: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    content: Value,
}

/// Byte range of the outermost brace span, if there is one
pub fn fragment_span(text: &str) -> Option<Range<usize>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| start..end + 1)
}

/// Validate a fragment as an `addBlock` instruction
pub fn parse_instruction(fragment: &str) -> Result<AddBlockInstruction> {
    let raw: RawInstruction = serde_json::from_str(fragment)
        .map_err(|e| BuilderError::MalformedInstruction(e.to_string()))?;

    match raw.action.as_deref() {
        Some(ADD_BLOCK_ACTION) => {}
        Some(other) => {
            return Err(BuilderError::MalformedInstruction(format!(
                "unsupported action {other:?}"
            )))
        }
        None => {
            return Err(BuilderError::MalformedInstruction(
                "missing action".to_string(),
            ))
        }
    }

    let kind: BlockKind = raw
        .kind
        .ok_or_else(|| BuilderError::MalformedInstruction("missing type".to_string()))?
        .parse()?;
    let content = BlockContent::from_value(kind, raw.content)?;
    Ok(AddBlockInstruction { content })
}

/// Locate, validate and cut out the instruction embedded in `text`.
pub fn extract(text: &str) -> Result<Extraction> {
    let span = fragment_span(text).ok_or_else(|| {
        BuilderError::MalformedInstruction("no structured fragment".to_string())
    })?;
    let instruction = parse_instruction(&text[span.clone()])?;
    let remainder = cut(&text[..span.start], &text[span.end..]);
    Ok(Extraction {
        instruction,
        remainder,
    })
}

/// Join the text around a removed fragment, dropping a code fence that
/// wrapped it. The gap closes to a line break if it held one, else a space.
fn cut(mut before: &str, mut after: &str) -> String {
    if let Some(rest) = after.trim_start().strip_prefix("```") {
        let trimmed = before.trim_end();
        let opened = trimmed
            .strip_suffix("```json")
            .or_else(|| trimmed.strip_suffix("```JSON"))
            .or_else(|| trimmed.strip_suffix("```"));
        if let Some(head) = opened {
            before = head;
            after = rest;
        }
    }

    let head = before.trim_end();
    let tail = after.trim_start();
    let gap = &before[head.len()..];
    let lead = &after[..after.len() - tail.len()];

    match (head.trim_start(), tail.trim_end()) {
        ("", tail) => tail.to_string(),
        (head, "") => head.to_string(),
        (head, tail) if gap.contains('\n') || lead.contains('\n') => format!("{head}\n{tail}"),
        (head, tail) => format!("{head} {tail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::HeroContent;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_is_greedy() {
        let text = "a {x} b {y} c";
        assert_eq!(fragment_span(text), Some(2..11));
        assert_eq!(&text[fragment_span(text).unwrap()], "{x} b {y}");
    }

    #[test]
    fn test_span_requires_ordered_braces() {
        assert_eq!(fragment_span("no braces"), None);
        assert_eq!(fragment_span("} then {"), None);
        assert_eq!(fragment_span("only {"), None);
    }

    #[test]
    fn test_extract_with_prose() {
        let text = r#"Sure! {"action":"addBlock","type":"hero","content":{"title":"Hi","subtitle":"There","cta":"Go"}} Enjoy."#;
        let extraction = extract(text).unwrap();
        assert_eq!(
            extraction.instruction.content,
            BlockContent::Hero(HeroContent {
                title: "Hi".to_string(),
                subtitle: "There".to_string(),
                cta: "Go".to_string(),
            })
        );
        assert_eq!(extraction.remainder, "Sure! Enjoy.");
    }

    #[test]
    fn test_extract_strips_fence() {
        let text = "Here it is:\n```json\n{\"action\":\"addBlock\",\"type\":\"text\"}\n```\n";
        let extraction = extract(text).unwrap();
        assert_eq!(extraction.instruction.kind(), BlockKind::Text);
        assert_eq!(extraction.remainder, "Here it is:");
    }

    #[test]
    fn test_extract_keeps_line_breaks_around_fragment() {
        let text = "Added a header.\n```json\n{\"action\":\"addBlock\",\"type\":\"header\"}\n```\nAnything else?";
        assert_eq!(extract(text).unwrap().remainder, "Added a header.\nAnything else?");

        let inline = r#"Your {"action":"addBlock","type":"text"} is ready."#;
        assert_eq!(extract(inline).unwrap().remainder, "Your is ready.");
    }

    #[test]
    fn test_bare_fragment_leaves_nothing() {
        let extraction = extract(r#"{"action":"addBlock","type":"footer"}"#).unwrap();
        assert_eq!(extraction.remainder, "");
    }

    #[test]
    fn test_missing_type_rejected() {
        let err = extract(r#"{ "action": "addBlock" }"#).unwrap_err();
        assert!(matches!(err, BuilderError::MalformedInstruction(m) if m == "missing type"));
    }

    #[test]
    fn test_wrong_action_rejected() {
        assert!(extract(r#"{"action":"removeBlock","type":"hero"}"#).is_err());
        assert!(extract(r#"{"type":"hero"}"#).is_err());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = extract(r#"{"action":"addBlock","type":"carousel"}"#).unwrap_err();
        assert!(matches!(err, BuilderError::UnknownBlockKind(_)));
    }

    #[test]
    fn test_prose_braces_rejected() {
        assert!(extract("use {{mustache}} syntax").is_err());
        assert!(extract("just some prose").is_err());
    }

    #[test]
    fn test_bad_content_rejected() {
        let err = extract(r#"{"action":"addBlock","type":"text","content":"hello"}"#).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidContent { .. }));
    }
}
