//! Row-level and list-level drag reorder.
//!
//! # Responsibility
//! - Move a whole canvas row before/after another row.
//! - Move one record inside a flat ordered list before/after another one.
//!
//! # Invariants
//! - Untouched elements keep their relative order.
//! - Canvas row numbers are resynchronized after every applied row move.
//! - Unresolved keys and self-drops are no-ops, never errors.

use crate::model::canvas::Canvas;
use crate::model::mark::MarkRecord;

/// Why a reorder request left the document unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Dragged or target key not present in the list.
    UnresolvedKey,
    /// Dragged and target resolve to the same element.
    SameIndex,
    /// Row index outside the canvas.
    OutOfRange,
    /// Move resolves to the element's current slot.
    SamePosition,
}

/// Result of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Element moved; indices refer to the list before and after the move.
    Moved { from: usize, to: usize },
    Unchanged(NoOpReason),
}

impl ReorderOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Moves the row at `source` before or after the row at `target`.
///
/// `target` is expressed in pre-removal indices; it shifts down by one when
/// the source row sits above it.
pub fn move_row(
    canvas: &mut Canvas,
    source: usize,
    target: usize,
    insert_after: bool,
) -> ReorderOutcome {
    if source == target {
        return ReorderOutcome::Unchanged(NoOpReason::SameIndex);
    }
    let row_count = canvas.rows.len();
    if source >= row_count || target >= row_count {
        return ReorderOutcome::Unchanged(NoOpReason::OutOfRange);
    }

    let adjusted_target = if source < target { target - 1 } else { target };
    let final_index = if insert_after {
        adjusted_target + 1
    } else {
        adjusted_target
    };
    if final_index == source {
        return ReorderOutcome::Unchanged(NoOpReason::SamePosition);
    }

    let row = canvas.rows.remove(source);
    canvas.rows.insert(final_index, row);
    canvas.renumber_rows();
    ReorderOutcome::Moved {
        from: source,
        to: final_index,
    }
}

/// Moves the element matching `dragged` next to the element matching
/// `target`, resolving both through `key_of`.
///
/// The move is applied as insert-clone-then-delete-original: the clone goes
/// to `target` (before) or `target + 1` (after), then the original is removed
/// from its slot, which shifted right by one when it sat at or after the
/// insertion point.
pub fn move_item_by<T, K, F>(
    list: &mut Vec<T>,
    dragged: &K,
    target: &K,
    insert_before: bool,
    key_of: F,
) -> ReorderOutcome
where
    T: Clone,
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    let dragged_index = list.iter().position(|item| key_of(item) == dragged);
    let target_index = list.iter().position(|item| key_of(item) == target);
    let (Some(dragged_index), Some(target_index)) = (dragged_index, target_index) else {
        return ReorderOutcome::Unchanged(NoOpReason::UnresolvedKey);
    };
    if dragged_index == target_index {
        return ReorderOutcome::Unchanged(NoOpReason::SameIndex);
    }

    let insert_position = if insert_before {
        target_index
    } else {
        target_index + 1
    };
    let copy = list[dragged_index].clone();
    list.insert(insert_position, copy);

    let delete_position = if dragged_index < insert_position {
        dragged_index
    } else {
        dragged_index + 1
    };
    list.remove(delete_position);

    let landed = if dragged_index < insert_position {
        insert_position - 1
    } else {
        insert_position
    };
    if landed == dragged_index {
        return ReorderOutcome::Unchanged(NoOpReason::SamePosition);
    }
    ReorderOutcome::Moved {
        from: dragged_index,
        to: landed,
    }
}

/// Reorders marks by stable id.
pub fn move_item_by_id<T>(
    list: &mut Vec<T>,
    dragged_id: &str,
    target_id: &str,
    insert_before: bool,
) -> ReorderOutcome
where
    T: MarkRecord + Clone,
{
    move_item_by(list, dragged_id, target_id, insert_before, |item: &T| {
        item.id()
    })
}

/// Reorders marks by natural key (url for bookmarks, text for text marks).
///
/// Compatibility path for callers that only know the key rendered in the
/// list row; prefer [`move_item_by_id`].
pub fn move_item<T>(
    list: &mut Vec<T>,
    dragged_key: &str,
    target_key: &str,
    insert_before: bool,
) -> ReorderOutcome
where
    T: MarkRecord + Clone,
{
    move_item_by(list, dragged_key, target_key, insert_before, |item: &T| {
        item.natural_key()
    })
}

/// Index a host tab should move to when dropped next to a target tab.
pub fn tab_drop_index(target_index: u32, insert_before: bool) -> u32 {
    if insert_before {
        target_index
    } else {
        target_index + 1
    }
}
