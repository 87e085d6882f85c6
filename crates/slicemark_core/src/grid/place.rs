//! First-fit placement of new cards.
//!
//! # Responsibility
//! - Find the first row/column window wide enough for a new card.
//! - Insert the card (or a new row) and resynchronize derived row numbers.
//!
//! # Invariants
//! - Rows are scanned top to bottom, columns left to right; the chosen
//!   column is the smallest free start in the first row that fits.
//! - Placement never produces overlapping spans.
//! - After insertion every card satisfies `position.row == row index + 1`.

use crate::model::canvas::{Canvas, CanvasItem, CanvasRow};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Requested span is outside `[1, total_cols]`.
    InvalidSpan { len: u8, total_cols: u8 },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSpan { len, total_cols } => {
                write!(f, "card span {len} is outside [1, {total_cols}]")
            }
        }
    }
}

impl Error for LayoutError {}

/// Where a new row goes when no existing row has room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowInsertPolicy {
    /// Insert at index 0 (the extension's observed behavior).
    #[default]
    Top,
    /// Append after the last row.
    Bottom,
}

/// Result of a placement query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Row index the card goes into; meaningless when `need_new_row`.
    pub target_row_index: usize,
    /// 1-based start column.
    pub target_col: u8,
    /// No existing row has room; a new row must be created.
    pub need_new_row: bool,
}

/// Rejects spans outside `[1, total_cols]`.
pub fn check_span(len: u8, total_cols: u8) -> Result<(), LayoutError> {
    if len == 0 || len > total_cols {
        return Err(LayoutError::InvalidSpan { len, total_cols });
    }
    Ok(())
}

/// Computes a first-fit placement for a card of span `len`.
///
/// # Errors
/// - [`LayoutError::InvalidSpan`] when `len` is outside `[1, total_cols]`.
pub fn place(canvas: &Canvas, len: u8) -> Result<Placement, LayoutError> {
    check_span(len, canvas.total_cols)?;
    let span = usize::from(len);
    let last_start = usize::from(canvas.total_cols) - span;

    for (row_index, row) in canvas.rows.iter().enumerate() {
        let occupied = row.occupancy(canvas.total_cols);
        let free_start =
            (0..=last_start).find(|&start| occupied[start..start + span].iter().all(|used| !used));
        if let Some(start) = free_start {
            return Ok(Placement {
                target_row_index: row_index,
                target_col: start as u8 + 1,
                need_new_row: false,
            });
        }
    }

    Ok(Placement {
        target_row_index: 0,
        target_col: 1,
        need_new_row: true,
    })
}

/// Places `item` on the canvas and returns the applied placement.
///
/// A new row is created according to `policy` when nothing fits. The
/// returned placement's `target_row_index` is the row the card ended up in.
///
/// # Errors
/// - [`LayoutError::InvalidSpan`] when `item.len` is outside the grid.
pub fn insert_item(
    canvas: &mut Canvas,
    mut item: CanvasItem,
    policy: RowInsertPolicy,
) -> Result<Placement, LayoutError> {
    let placement = place(canvas, item.len)?;
    item.position.col = placement.target_col;

    let row_index = if placement.need_new_row {
        let row = CanvasRow::with_item(item);
        match policy {
            RowInsertPolicy::Top => {
                canvas.rows.insert(0, row);
                0
            }
            RowInsertPolicy::Bottom => {
                canvas.rows.push(row);
                canvas.rows.len() - 1
            }
        }
    } else {
        canvas.rows[placement.target_row_index].items.push(item);
        placement.target_row_index
    };

    canvas.renumber_rows();
    Ok(Placement {
        target_row_index: row_index,
        ..placement
    })
}
