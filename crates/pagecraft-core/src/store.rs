// SPDX-License-Identifier: AGPL-3.0-or-later
//! Single-owner stores for the document and the theme
//!
//! Each store holds the authoritative in-memory state and writes a whole
//! snapshot to the persistence collaborator after every change. Writes are
//! best-effort: a failed write is logged and the in-memory state stays
//! authoritative.

use std::sync::Arc;

use crate::block::{Block, BlockContent, BlockId, BlockKind, BlockUpdate};
use crate::defaults::default_styles;
use crate::document::Document;
use crate::reorder::DragEnd;
use crate::templates::Template;
use crate::theme::{SiteTheme, ThemePatch};
use crate::traits::KeyValueStore;

/// Storage key of the document snapshot
pub const DOCUMENT_KEY: &str = "builder_blocks";

/// Storage key of the theme snapshot
pub const THEME_KEY: &str = "builder_theme";

/// Owns the document and the current selection.
///
/// Every operation is total; missing ids are no-ops reported as `false`.
pub struct DocumentStore {
    document: Document,
    selection: Option<BlockId>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl DocumentStore {
    /// Hydrate from [`DOCUMENT_KEY`]
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_key(storage, DOCUMENT_KEY)
    }

    /// Hydrate from an arbitrary key. Unreadable or malformed snapshots
    /// start an empty document.
    pub fn open_with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let document = match storage.get(&key) {
            Ok(Some(raw)) => Document::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(%key, error = %e, "stored document is malformed, starting empty");
                Document::new()
            }),
            Ok(None) => Document::new(),
            Err(e) => {
                tracing::warn!(%key, error = %e, "could not read stored document, starting empty");
                Document::new()
            }
        };
        tracing::debug!(%key, blocks = document.len(), "document store opened");

        Self {
            document,
            selection: None,
            storage,
            key,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    /// Raw selection, possibly dangling
    pub fn selection(&self) -> Option<&BlockId> {
        self.selection.as_ref()
    }

    /// The selected block, treating a dangling selection as none
    pub fn selected_block(&self) -> Option<&Block> {
        self.selection.as_ref().and_then(|id| self.document.get(id))
    }

    /// Append a block of `kind` with default content and styles, and select it.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        self.insert_new(Block::with_defaults(kind))
    }

    /// Append a block carrying `content`, with the variant's default styles,
    /// and select it.
    pub fn add_block_with(&mut self, content: BlockContent) -> BlockId {
        let styles = default_styles(content.kind());
        self.insert_new(Block::new(content, styles))
    }

    fn insert_new(&mut self, mut block: Block) -> BlockId {
        // Fresh v4 ids do not collide in practice; regenerate if one ever does.
        while self.document.contains(block.id()) {
            block = Block::new(block.content().clone(), block.styles().clone());
        }
        let id = block.id().clone();
        tracing::debug!(%id, kind = %block.kind(), "adding block");
        self.document.push(block);
        self.selection = Some(id.clone());
        self.persist();
        id
    }

    pub fn update_block(&mut self, id: &BlockId, update: BlockUpdate) -> bool {
        let changed = self.document.update(id, update);
        if changed {
            self.persist();
        }
        changed
    }

    /// Remove a block; clears the selection if it pointed at it.
    pub fn remove_block(&mut self, id: &BlockId) -> bool {
        if self.document.remove(id).is_none() {
            return false;
        }
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        self.persist();
        true
    }

    pub fn move_block(&mut self, active: &BlockId, over: &BlockId) -> bool {
        let changed = self.document.move_block(active, over);
        if changed {
            self.persist();
        }
        changed
    }

    /// Apply a finished drag gesture. Drops without a distinct target do
    /// nothing.
    pub fn apply_drag(&mut self, end: &DragEnd) -> bool {
        match end.move_request() {
            Some((active, over)) => self.move_block(active, over),
            None => {
                tracing::debug!(active = %end.active, "drag ended without a target");
                false
            }
        }
    }

    /// Set the selection. No existence check.
    pub fn select_block(&mut self, id: Option<BlockId>) {
        self.selection = id;
    }

    /// Append a named template in one step. Returns the number of blocks
    /// inserted; unknown names insert nothing.
    pub fn insert_template(&mut self, name: &str) -> usize {
        let Some(template) = Template::from_name(name) else {
            tracing::debug!(name, "unknown template");
            return 0;
        };
        let blocks = template.blocks();
        let count = blocks.len();
        if !self.document.append(blocks) {
            return 0;
        }
        tracing::info!(template = template.name(), count, "template inserted");
        self.persist();
        count
    }

    /// Drop every block and the selection.
    pub fn clear(&mut self) {
        self.document.clear();
        self.selection = None;
        self.persist();
    }

    fn persist(&self) {
        let snapshot = match self.document.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not serialize document");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &snapshot) {
            tracing::warn!(key = %self.key, error = %e, "could not persist document");
        }
    }
}

/// Owns the site theme
pub struct ThemeStore {
    theme: SiteTheme,
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl ThemeStore {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_key(storage, THEME_KEY)
    }

    /// Hydrate from `key`. Stored fields overlay the defaults; malformed
    /// snapshots fall back to the default theme.
    pub fn open_with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let theme = match storage.get(&key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(%key, error = %e, "stored theme is malformed, using defaults");
                SiteTheme::default()
            }),
            Ok(None) => SiteTheme::default(),
            Err(e) => {
                tracing::warn!(%key, error = %e, "could not read stored theme, using defaults");
                SiteTheme::default()
            }
        };
        Self {
            theme,
            storage,
            key,
        }
    }

    pub fn theme(&self) -> &SiteTheme {
        &self.theme
    }

    /// Shallow-merge `patch` into the theme
    pub fn update(&mut self, patch: ThemePatch) -> bool {
        let changed = self.theme.apply(patch);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn reset(&mut self) {
        self.theme = SiteTheme::default();
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.theme) {
            Ok(json) => {
                if let Err(e) = self.storage.set(&self.key, &json) {
                    tracing::warn!(key = %self.key, error = %e, "could not persist theme");
                }
            }
            Err(e) => tracing::warn!(key = %self.key, error = %e, "could not serialize theme"),
        }
    }
}
