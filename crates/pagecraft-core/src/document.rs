// SPDX-License-Identifier: AGPL-3.0-or-later
//! The ordered block sequence that makes up a page
//!
//! Order is rendering order, top to bottom. Ids are unique. All edits are
//! total: a missing id leaves the document untouched and the method reports
//! `false`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::block::{Block, BlockId, BlockUpdate};
use crate::traits::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a block list, dropping any block whose id was already seen.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut seen = HashSet::with_capacity(blocks.len());
        let mut kept = Vec::with_capacity(blocks.len());
        for block in blocks {
            if seen.insert(block.id().clone()) {
                kept.push(block);
            } else {
                tracing::warn!(id = %block.id(), "dropping block with duplicate id");
            }
        }
        Self { blocks: kept }
    }

    /// Parse a stored snapshot (JSON array of block records)
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serialize to the stored snapshot form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.position(id).is_some()
    }

    /// Append one block. Refused if its id is already present.
    pub fn push(&mut self, block: Block) -> bool {
        if self.contains(block.id()) {
            tracing::debug!(id = %block.id(), "refusing to append duplicate id");
            return false;
        }
        self.blocks.push(block);
        true
    }

    /// Append a group of blocks in one step. If any id collides with the
    /// document or with another block in the group, nothing is appended.
    pub fn append(&mut self, blocks: Vec<Block>) -> bool {
        let mut incoming = HashSet::with_capacity(blocks.len());
        let collides = blocks
            .iter()
            .any(|b| self.contains(b.id()) || !incoming.insert(b.id().clone()));
        if collides {
            tracing::debug!("refusing group append with colliding ids");
            return false;
        }
        self.blocks.extend(blocks);
        true
    }

    /// Apply a partial update to the block with `id`.
    ///
    /// Content of a different variant than the block is ignored; the block's
    /// type never changes. Returns `true` if any part was applied.
    pub fn update(&mut self, id: &BlockId, update: BlockUpdate) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id() == id) else {
            tracing::debug!(%id, "update for missing block");
            return false;
        };

        let mut applied = false;
        if let Some(content) = update.content {
            if content.kind() == block.kind() {
                block.set_content(content);
                applied = true;
            } else {
                tracing::debug!(
                    %id,
                    block = %block.kind(),
                    content = %content.kind(),
                    "ignoring content of a different block type"
                );
            }
        }
        if let Some(styles) = update.styles {
            block.set_styles(styles);
            applied = true;
        }
        applied
    }

    /// Remove the block with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: &BlockId) -> Option<Block> {
        match self.position(id) {
            Some(index) => Some(self.blocks.remove(index)),
            None => {
                tracing::debug!(%id, "remove for missing block");
                None
            }
        }
    }

    /// Move `active` into the slot currently held by `over`.
    ///
    /// Splice-and-reinsert: blocks between the two positions shift by one.
    /// Missing ids and self-moves change nothing.
    pub fn move_block(&mut self, active: &BlockId, over: &BlockId) -> bool {
        if active == over {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(active), self.position(over)) else {
            tracing::debug!(%active, %over, "move with missing block");
            return false;
        };
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        true
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

/// Records are converted one by one; a record that does not form a valid
/// block is dropped so the rest of the page survives.
impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let records = Vec::<Value>::deserialize(deserializer)?;
        let blocks = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Block>(record) {
                Ok(block) => Some(block),
                Err(e) => {
                    tracing::warn!(index, error = %e, "dropping unreadable block record");
                    None
                }
            })
            .collect();
        Ok(Self::from_blocks(blocks))
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::block::{BlockKind, Styles};
    use crate::defaults::{default_content, default_styles};
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = BlockKind> {
        proptest::sample::select(BlockKind::ALL.to_vec())
    }

    fn document_strategy() -> impl Strategy<Value = Document> {
        prop::collection::vec(kind_strategy(), 0..12).prop_map(|kinds| {
            Document::from_blocks(kinds.into_iter().map(Block::with_defaults).collect())
        })
    }

    fn labelled(n: usize) -> Document {
        Document::from_blocks(
            (0..n)
                .map(|i| {
                    Block::from_parts(
                        BlockId::from(format!("b{i}")),
                        default_content(BlockKind::Text),
                        Styles::new(),
                    )
                })
                .collect(),
        )
    }

    proptest! {
        // Property: freshly created blocks never share an id
        #[test]
        fn prop_ids_unique(kinds in prop::collection::vec(kind_strategy(), 0..40)) {
            let mut doc = Document::new();
            for kind in kinds {
                prop_assert!(doc.push(Block::with_defaults(kind)));
            }
            let unique: HashSet<_> = doc.iter().map(|b| b.id().clone()).collect();
            prop_assert_eq!(unique.len(), doc.len());
        }

        // Property: removal keeps the relative order of everything else
        #[test]
        fn prop_remove_preserves_order(n in 1usize..20, k in 0usize..20) {
            let k = k % n;
            let mut doc = labelled(n);
            let mut expected: Vec<BlockId> = doc.iter().map(|b| b.id().clone()).collect();
            let target = expected.remove(k);
            prop_assert!(doc.remove(&target).is_some());
            let actual: Vec<BlockId> = doc.iter().map(|b| b.id().clone()).collect();
            prop_assert_eq!(actual, expected);
        }

        // Property: move matches Vec remove + insert at the target's old index
        #[test]
        fn prop_move_is_splice(n in 1usize..20, a in 0usize..20, o in 0usize..20) {
            let (a, o) = (a % n, o % n);
            let mut doc = labelled(n);
            let mut expected: Vec<BlockId> = doc.iter().map(|b| b.id().clone()).collect();
            let active = expected[a].clone();
            let over = expected[o].clone();
            let moved = expected.remove(a);
            expected.insert(o, moved);

            let changed = doc.move_block(&active, &over);
            prop_assert_eq!(changed, a != o);
            let actual: Vec<BlockId> = doc.iter().map(|b| b.id().clone()).collect();
            prop_assert_eq!(actual, expected);
        }

        // Property: stored snapshot reloads to an identical document
        #[test]
        fn prop_json_roundtrip(doc in document_strategy()) {
            let json = doc.to_json().expect("serialize");
            let reloaded = Document::from_json(&json).expect("deserialize");
            prop_assert_eq!(reloaded, doc);
        }

        // Property: default styles survive the roundtrip for every variant
        #[test]
        fn prop_default_styles_roundtrip(kind in kind_strategy()) {
            let json = serde_json::to_string(&default_styles(kind)).expect("serialize");
            let styles: Styles = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(styles, default_styles(kind));
        }
    }
}
