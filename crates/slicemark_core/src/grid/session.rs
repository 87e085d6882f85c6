//! Caller-owned gesture sessions for resize and drag reorder.
//!
//! # Responsibility
//! - Carry per-gesture state between pointer/drag events explicitly.
//! - Turn raw pointer geometry into engine inputs (column deltas, before/after).
//!
//! # Invariants
//! - At most one resize is active per [`ResizeTracker`].
//! - Ending a session always clears it, whether it commits or aborts.
//! - Sessions never touch persisted documents; callers commit the result.

use super::reorder::tab_drop_index;
use super::resize::{pointer_delta_cols, resize, ResizeEdge, ResizeResult};
use crate::model::canvas::{CardId, TOTAL_COLS};
use crate::model::mark::MarkId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Gesture lifecycle misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A gesture is already in flight.
    AlreadyActive,
    /// No gesture is in flight.
    NoActiveSession,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyActive => write!(f, "a resize gesture is already active"),
            Self::NoActiveSession => write!(f, "no resize gesture is active"),
        }
    }
}

impl Error for SessionError {}

/// State captured when the pointer grabs a card edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub item_id: CardId,
    pub edge: ResizeEdge,
    pub start_col: u8,
    pub start_len: u8,
    pub start_x: f64,
    /// Pixel width of the whole grid at gesture start.
    pub container_width: f64,
    pub total_cols: u8,
}

/// Final resize to persist for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeCommit {
    pub item_id: CardId,
    pub result: ResizeResult,
    /// `false` when the pointer came back to the starting column/span.
    pub changed: bool,
}

impl ResizeSession {
    /// Starts a session for the card's current `col`/`len`.
    pub fn begin(
        item_id: impl Into<CardId>,
        edge: ResizeEdge,
        start_col: u8,
        start_len: u8,
        start_x: f64,
        container_width: f64,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            edge,
            start_col,
            start_len,
            start_x,
            container_width,
            total_cols: TOTAL_COLS,
        }
    }

    /// Live preview for the current pointer x.
    pub fn update(&self, pointer_x: f64) -> ResizeResult {
        let delta = pointer_delta_cols(
            pointer_x - self.start_x,
            self.container_width,
            self.total_cols,
        );
        resize(
            self.edge,
            self.start_col,
            self.start_len,
            delta,
            self.total_cols,
        )
    }

    /// Consumes the session and returns the commit for pointer release.
    pub fn end(self, pointer_x: f64) -> ResizeCommit {
        let result = self.update(pointer_x);
        let changed = !self.is_noop(result);
        ResizeCommit {
            item_id: self.item_id,
            result,
            changed,
        }
    }

    /// Whether the commit would leave the card unchanged.
    pub fn is_noop(&self, result: ResizeResult) -> bool {
        result.col == self.start_col && result.len == self.start_len
    }
}

/// Holder enforcing one active resize at a time.
#[derive(Debug, Default)]
pub struct ResizeTracker {
    active: Option<ResizeSession>,
}

impl ResizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Starts tracking `session`.
    ///
    /// # Errors
    /// - [`SessionError::AlreadyActive`] when another resize is in flight;
    ///   call [`ResizeTracker::abort`] first.
    pub fn begin(&mut self, session: ResizeSession) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyActive);
        }
        self.active = Some(session);
        Ok(())
    }

    /// Preview for the active session.
    pub fn update(&self, pointer_x: f64) -> Result<ResizeResult, SessionError> {
        self.active
            .as_ref()
            .map(|session| session.update(pointer_x))
            .ok_or(SessionError::NoActiveSession)
    }

    /// Ends the active session and returns its commit.
    pub fn end(&mut self, pointer_x: f64) -> Result<ResizeCommit, SessionError> {
        self.active
            .take()
            .map(|session| session.end(pointer_x))
            .ok_or(SessionError::NoActiveSession)
    }

    /// Drops the active session without committing.
    pub fn abort(&mut self) -> Option<ResizeSession> {
        self.active.take()
    }
}

/// Side of the hovered element the drop lands on.
///
/// Pointer above the element's vertical midpoint means "before".
pub fn drop_before(pointer_y: f64, element_top: f64, element_height: f64) -> bool {
    pointer_y < element_top + element_height / 2.0
}

/// Row move resolved at drop time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMove {
    pub source: usize,
    pub target: usize,
    pub insert_after: bool,
}

/// Drag of a whole canvas row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDragSession {
    source: usize,
    hover: Option<(usize, bool)>,
}

impl RowDragSession {
    pub fn begin(source_row: usize) -> Self {
        Self {
            source: source_row,
            hover: None,
        }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// Records the row under the pointer. Hovering the source row is ignored.
    pub fn hover(&mut self, target_row: usize, pointer_y: f64, row_top: f64, row_height: f64) {
        if target_row == self.source {
            return;
        }
        let insert_after = !drop_before(pointer_y, row_top, row_height);
        self.hover = Some((target_row, insert_after));
    }

    /// Ends the drag; `None` means nothing to commit.
    pub fn finish(self) -> Option<RowMove> {
        self.hover.map(|(target, insert_after)| RowMove {
            source: self.source,
            target,
            insert_after,
        })
    }
}

/// Flat list a drag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bookmarks,
    TextMarks,
    Tabs,
}

/// List move resolved at drop time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMove {
    pub kind: ListKind,
    pub dragged_id: MarkId,
    pub target_id: MarkId,
    pub insert_before: bool,
}

/// Drag of one record inside a flat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDragSession {
    kind: ListKind,
    dragged_id: MarkId,
    hover: Option<(MarkId, bool)>,
}

impl ListDragSession {
    pub fn begin(kind: ListKind, dragged_id: impl Into<MarkId>) -> Self {
        Self {
            kind,
            dragged_id: dragged_id.into(),
            hover: None,
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Records the hovered row. Returns `false` when the row cannot accept
    /// this drop (another list, or the dragged row itself).
    pub fn hover(
        &mut self,
        kind: ListKind,
        target_id: &str,
        pointer_y: f64,
        row_top: f64,
        row_height: f64,
    ) -> bool {
        if kind != self.kind || target_id == self.dragged_id {
            return false;
        }
        let before = drop_before(pointer_y, row_top, row_height);
        self.hover = Some((target_id.to_string(), before));
        true
    }

    /// Ends the drag; `None` means nothing to commit.
    pub fn finish(self) -> Option<ListMove> {
        let kind = self.kind;
        let dragged_id = self.dragged_id;
        self.hover.map(|(target_id, insert_before)| ListMove {
            kind,
            dragged_id,
            target_id,
            insert_before,
        })
    }
}

impl ListMove {
    /// Host strip index for a tab move next to a tab at `target_index`.
    pub fn tab_index(&self, target_index: u32) -> u32 {
        tab_drop_index(target_index, self.insert_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_rejects_second_begin_until_abort() {
        let mut tracker = ResizeTracker::new();
        tracker
            .begin(ResizeSession::begin("a", ResizeEdge::Right, 1, 2, 0.0, 500.0))
            .unwrap();
        let err = tracker
            .begin(ResizeSession::begin("b", ResizeEdge::Left, 1, 2, 0.0, 500.0))
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyActive);

        let aborted = tracker.abort().expect("session should be active");
        assert_eq!(aborted.item_id, "a");
        assert!(!tracker.is_active());
        assert_eq!(tracker.end(0.0).unwrap_err(), SessionError::NoActiveSession);
    }

    #[test]
    fn preview_and_commit_agree() {
        let session = ResizeSession::begin("card", ResizeEdge::Right, 2, 2, 100.0, 500.0);
        let preview = session.update(300.0);
        let commit = session.end(300.0);
        assert_eq!(preview, ResizeResult { col: 2, len: 4 });
        assert_eq!(commit.result, preview);
        assert_eq!(commit.item_id, "card");
        assert!(commit.changed);
    }

    #[test]
    fn releasing_at_start_is_unchanged() {
        let session = ResizeSession::begin("card", ResizeEdge::Left, 2, 2, 100.0, 500.0);
        assert!(session.is_noop(session.update(130.0)));
        assert!(!session.end(130.0).changed);
    }

    #[test]
    fn huge_pointer_travel_clamps_to_grid() {
        let session = ResizeSession::begin("a", ResizeEdge::Right, 1, 2, 0.0, 500.0);
        assert_eq!(session.update(1e12), ResizeResult { col: 1, len: 5 });
        assert_eq!(session.update(-1e12), ResizeResult { col: 1, len: 1 });
    }

    #[test]
    fn row_drag_uses_vertical_midpoint() {
        let mut session = RowDragSession::begin(0);
        session.hover(2, 129.0, 100.0, 60.0);
        assert_eq!(
            session.clone().finish(),
            Some(RowMove {
                source: 0,
                target: 2,
                insert_after: false
            })
        );
        session.hover(2, 131.0, 100.0, 60.0);
        assert!(session.finish().unwrap().insert_after);
    }

    #[test]
    fn row_drag_without_target_aborts() {
        let mut session = RowDragSession::begin(1);
        session.hover(1, 0.0, 0.0, 60.0);
        assert_eq!(session.finish(), None);
    }

    #[test]
    fn list_drag_ignores_other_lists_and_self() {
        let mut session = ListDragSession::begin(ListKind::Bookmarks, "a");
        assert!(!session.hover(ListKind::TextMarks, "b", 0.0, 0.0, 20.0));
        assert!(!session.hover(ListKind::Bookmarks, "a", 0.0, 0.0, 20.0));
        assert!(session.hover(ListKind::Bookmarks, "b", 15.0, 0.0, 20.0));

        let dropped = session.finish().expect("drop should resolve");
        assert_eq!(dropped.target_id, "b");
        assert!(!dropped.insert_before);
        assert_eq!(dropped.tab_index(3), 4);
    }
}
