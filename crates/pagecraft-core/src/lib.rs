// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pagecraft Core - Block document model for the page builder
//!
//! This crate provides:
//! - Typed content blocks and the ordered document they form
//! - Variant defaults and named templates
//! - Single-owner stores that persist every change to a key-value backend
//! - The drag-to-reorder protocol
//! - Extraction of `addBlock` instructions from assistant replies

pub mod block;
pub mod bridge;
pub mod defaults;
pub mod document;
pub mod instruction;
pub mod reorder;
pub mod store;
pub mod templates;
pub mod theme;
pub mod traits;
pub mod viewport;

pub use block::{Block, BlockContent, BlockId, BlockKind, BlockUpdate, Styles};
pub use bridge::{apply_assistant_text, ChatReply};
pub use document::Document;
pub use reorder::{DragEnd, DragSession};
pub use store::{DocumentStore, ThemeStore};
pub use templates::Template;
pub use theme::{SiteTheme, ThemePatch};
pub use traits::{BuilderError, KeyValueStore, MemoryStore, Result};
pub use viewport::{DeviceType, Viewport};
