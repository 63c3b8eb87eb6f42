// SPDX-License-Identifier: AGPL-3.0-or-later
//! Applies assistant replies to the document
//!
//! At most one instruction is applied per reply. Anything that fails to
//! extract or validate is shown to the user verbatim and leaves the document
//! untouched.

use crate::block::{BlockId, BlockKind};
use crate::instruction::extract;
use crate::store::DocumentStore;

/// What the chat panel shows after an assistant reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    /// Block added by an embedded instruction, if one was applied
    pub added: Option<BlockId>,
}

/// Fallback message when an instruction was the whole reply
pub fn confirmation(kind: BlockKind) -> String {
    format!("Added a {kind} section for you!")
}

/// Extract and apply an `addBlock` instruction from `text`, if it has one.
pub fn apply_assistant_text(store: &mut DocumentStore, text: &str) -> ChatReply {
    let extraction = match extract(text) {
        Ok(extraction) => extraction,
        Err(e) => {
            tracing::debug!(error = %e, "no usable instruction, showing reply as text");
            return ChatReply {
                text: text.to_string(),
                added: None,
            };
        }
    };

    let kind = extraction.instruction.kind();
    let id = store.add_block_with(extraction.instruction.content);
    tracing::info!(%id, %kind, "applied assistant instruction");

    let text = if extraction.remainder.is_empty() {
        confirmation(kind)
    } else {
        extraction.remainder
    };
    ChatReply {
        text,
        added: Some(id),
    }
}
