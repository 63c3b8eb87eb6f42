// SPDX-License-Identifier: AGPL-3.0-or-later
//! Drag-to-reorder protocol
//!
//! The gesture itself is advisory. The model only sees the discrete
//! `(active, over)` pair once a drop completes over a valid target. Pointer
//! and keyboard paths both end in a [`DragEnd`].

use crate::block::BlockId;
use crate::document::Document;

/// Outcome of a finished drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub active: BlockId,
    /// Block under the pointer at release, if any
    pub over: Option<BlockId>,
}

impl DragEnd {
    /// The move this drop asks for, or `None` when it must not mutate
    /// (no target, or released over itself).
    pub fn move_request(&self) -> Option<(&BlockId, &BlockId)> {
        match &self.over {
            Some(over) if *over != self.active => Some((&self.active, over)),
            _ => None,
        }
    }
}

/// In-flight pointer drag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    active: Option<BlockId>,
    over: Option<BlockId>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up a block. Any earlier unfinished gesture is discarded.
    pub fn start(&mut self, active: BlockId) {
        self.over = None;
        self.active = Some(active);
    }

    /// Pointer entered a block
    pub fn hover(&mut self, over: BlockId) {
        if self.active.is_some() {
            self.over = Some(over);
        }
    }

    /// Pointer left every valid target
    pub fn leave(&mut self) {
        self.over = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Release. Returns the finished gesture if one was in progress.
    pub fn release(&mut self) -> Option<DragEnd> {
        let active = self.active.take()?;
        Some(DragEnd {
            active,
            over: self.over.take(),
        })
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Keyboard reordering: move `active` one slot in `direction`.
///
/// Produces the same drop a pointer gesture onto the neighbour would. At
/// either end of the document, or for an unknown block, there is no target.
pub fn keyboard_drop(doc: &Document, active: &BlockId, direction: Direction) -> DragEnd {
    let over = doc.position(active).and_then(|index| {
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index + 1,
        };
        doc.blocks().get(neighbour).map(|b| b.id().clone())
    });
    DragEnd {
        active: active.clone(),
        over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockKind, Styles};
    use crate::defaults::default_content;

    fn doc(ids: &[&str]) -> Document {
        Document::from_blocks(
            ids.iter()
                .map(|id| {
                    Block::from_parts(
                        BlockId::from(*id),
                        default_content(BlockKind::Text),
                        Styles::new(),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_drop_without_target() {
        let mut session = DragSession::new();
        session.start("A".into());
        session.hover("B".into());
        session.leave();
        let end = session.release().unwrap();
        assert_eq!(end.move_request(), None);
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_drop_on_self() {
        let mut session = DragSession::new();
        session.start("A".into());
        session.hover("A".into());
        assert_eq!(session.release().unwrap().move_request(), None);
    }

    #[test]
    fn test_drop_on_target() {
        let mut session = DragSession::new();
        session.start("A".into());
        session.hover("B".into());
        session.hover("C".into());
        let end = session.release().unwrap();
        let (active, over) = end.move_request().unwrap();
        assert_eq!(active.as_str(), "A");
        assert_eq!(over.as_str(), "C");
    }

    #[test]
    fn test_hover_without_start_is_ignored() {
        let mut session = DragSession::new();
        session.hover("B".into());
        assert_eq!(session.release(), None);
    }

    #[test]
    fn test_keyboard_neighbours() {
        let d = doc(&["A", "B", "C"]);
        let down = keyboard_drop(&d, &"A".into(), Direction::Down);
        assert_eq!(down.over, Some("B".into()));
        let up = keyboard_drop(&d, &"C".into(), Direction::Up);
        assert_eq!(up.over, Some("B".into()));
    }

    #[test]
    fn test_keyboard_edges_have_no_target() {
        let d = doc(&["A", "B"]);
        assert_eq!(keyboard_drop(&d, &"A".into(), Direction::Up).move_request(), None);
        assert_eq!(keyboard_drop(&d, &"B".into(), Direction::Down).move_request(), None);
        assert_eq!(keyboard_drop(&d, &"Z".into(), Direction::Down).move_request(), None);
    }
}
