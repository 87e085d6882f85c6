//! Canvas grid document model.
//!
//! # Responsibility
//! - Define the persisted canvas shape: ordered rows of positioned cards.
//! - Provide span/occupancy helpers shared by layout, reorder and resize.
//!
//! # Invariants
//! - `total_cols` is fixed at [`TOTAL_COLS`] for the document lifetime.
//! - Rows are never persisted empty.
//! - Item spans inside one row never overlap and never exceed `total_cols`.
//! - `position.row` is derived (`row index + 1`); row membership is
//!   authoritative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Fixed column count of every canvas row.
pub const TOTAL_COLS: u8 = 5;
/// Span assigned to freshly captured cards.
pub const DEFAULT_CARD_LEN: u8 = 3;
/// Pixel height assigned to freshly created rows.
pub const DEFAULT_ROW_HEIGHT: f64 = 60.0;

/// Opaque unique card identifier.
///
/// Legacy documents carry base36 timestamp ids, so the wire type stays a
/// plain string; new cards get a UUID v4 string.
pub type CardId = String;

/// Generates a fresh card id.
pub fn new_card_id() -> CardId {
    Uuid::new_v4().to_string()
}

/// 1-based grid coordinates of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u32,
    pub col: u8,
}

impl Default for GridPosition {
    fn default() -> Self {
        Self { row: 1, col: 1 }
    }
}

/// One saved card on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    pub id: CardId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
    /// Column span in `[1, TOTAL_COLS]`.
    pub len: u8,
    #[serde(default)]
    pub position: GridPosition,
}

impl CanvasItem {
    /// Creates a card with default span and position `{row: 1, col: 1}`.
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: new_card_id(),
            url: url.into(),
            text: text.into(),
            len: DEFAULT_CARD_LEN,
            position: GridPosition::default(),
        }
    }

    /// Last occupied column (1-based, inclusive).
    pub fn end_col(&self) -> u16 {
        u16::from(self.position.col) + u16::from(self.len) - 1
    }

    /// Whether the spans of `self` and `other` share a column.
    pub fn overlaps(&self, other: &CanvasItem) -> bool {
        u16::from(self.position.col) <= other.end_col()
            && u16::from(other.position.col) <= self.end_col()
    }
}

/// One canvas row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasRow {
    #[serde(default)]
    pub items: Vec<CanvasItem>,
    #[serde(default = "default_row_height")]
    pub height: f64,
}

impl CanvasRow {
    /// Creates a row holding one card.
    pub fn with_item(item: CanvasItem) -> Self {
        Self {
            items: vec![item],
            height: DEFAULT_ROW_HEIGHT,
        }
    }

    /// Column occupancy of this row, indexed from 0.
    ///
    /// Spans reaching past `total_cols` are truncated instead of panicking so
    /// a hand-edited document cannot crash placement.
    pub fn occupancy(&self, total_cols: u8) -> Vec<bool> {
        let mut occupied = vec![false; usize::from(total_cols)];
        for item in &self.items {
            let start = usize::from(item.position.col.saturating_sub(1));
            let end = (start + usize::from(item.len)).min(occupied.len());
            for slot in occupied.iter_mut().take(end).skip(start) {
                *slot = true;
            }
        }
        occupied
    }
}

fn default_row_height() -> f64 {
    DEFAULT_ROW_HEIGHT
}

fn default_total_cols() -> u8 {
    TOTAL_COLS
}

/// Grid document holding ordered rows of positioned cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    #[serde(default = "default_total_cols")]
    pub total_cols: u8,
    #[serde(default)]
    pub rows: Vec<CanvasRow>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            total_cols: TOTAL_COLS,
            rows: Vec::new(),
        }
    }
}

/// Structural violations reported by [`Canvas::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasValidationError {
    /// Document column count differs from the fixed grid width.
    UnexpectedColumnCount { expected: u8, actual: u8 },
    /// Row with no items.
    EmptyRow { row_index: usize },
    /// Card span outside `[1, total_cols]`, or a column outside the grid.
    SpanOutOfBounds { id: CardId, col: u8, len: u8 },
    /// Two cards in one row share a column.
    Overlap { first: CardId, second: CardId },
    /// Derived `position.row` disagrees with row membership.
    StaleRowNumber {
        id: CardId,
        expected: u32,
        actual: u32,
    },
}

impl Display for CanvasValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedColumnCount { expected, actual } => {
                write!(f, "canvas must have {expected} columns, got {actual}")
            }
            Self::EmptyRow { row_index } => write!(f, "canvas row {row_index} is empty"),
            Self::SpanOutOfBounds { id, col, len } => {
                write!(f, "card {id} span col={col} len={len} is outside the grid")
            }
            Self::Overlap { first, second } => {
                write!(f, "cards {first} and {second} overlap")
            }
            Self::StaleRowNumber {
                id,
                expected,
                actual,
            } => write!(
                f,
                "card {id} has position.row={actual}, expected {expected}"
            ),
        }
    }
}

impl Error for CanvasValidationError {}

impl Canvas {
    /// Total number of cards across all rows.
    pub fn item_count(&self) -> usize {
        self.rows.iter().map(|row| row.items.len()).sum()
    }

    /// Finds a card by id, returning `(row_index, item)`.
    pub fn find_item(&self, id: &str) -> Option<(usize, &CanvasItem)> {
        self.rows.iter().enumerate().find_map(|(row_index, row)| {
            row.items
                .iter()
                .find(|item| item.id == id)
                .map(|item| (row_index, item))
        })
    }

    /// Rewrites every card's `position.row` to `row index + 1`.
    pub fn renumber_rows(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            let row_number = index as u32 + 1;
            for item in &mut row.items {
                item.position.row = row_number;
            }
        }
    }

    /// Removes one card by id and drops its row when it becomes empty.
    ///
    /// Returns the removed card. Remaining rows are renumbered only when a
    /// row was dropped; removing a non-last card touches nothing else.
    pub fn remove_item(&mut self, id: &str) -> Option<CanvasItem> {
        let (row_index, item_index) = self.rows.iter().enumerate().find_map(|(row_index, row)| {
            row.items
                .iter()
                .position(|item| item.id == id)
                .map(|item_index| (row_index, item_index))
        })?;

        let removed = self.rows[row_index].items.remove(item_index);
        if self.rows[row_index].items.is_empty() {
            self.rows.remove(row_index);
            self.renumber_rows();
        }
        Some(removed)
    }

    /// Drops empty rows and resynchronizes derived row numbers.
    ///
    /// Applied to documents read from storage so older writers that left an
    /// empty row behind do not leak it into layout.
    pub fn compact(&mut self) {
        let before = self.rows.len();
        self.rows.retain(|row| !row.items.is_empty());
        if self.rows.len() != before || self.has_stale_row_numbers() {
            self.renumber_rows();
        }
    }

    fn has_stale_row_numbers(&self) -> bool {
        self.rows.iter().enumerate().any(|(index, row)| {
            row.items
                .iter()
                .any(|item| item.position.row != index as u32 + 1)
        })
    }

    /// Checks every structural invariant of the document.
    pub fn validate(&self) -> Result<(), CanvasValidationError> {
        if self.total_cols != TOTAL_COLS {
            return Err(CanvasValidationError::UnexpectedColumnCount {
                expected: TOTAL_COLS,
                actual: self.total_cols,
            });
        }

        for (row_index, row) in self.rows.iter().enumerate() {
            if row.items.is_empty() {
                return Err(CanvasValidationError::EmptyRow { row_index });
            }

            for (offset, item) in row.items.iter().enumerate() {
                if item.len == 0
                    || item.position.col == 0
                    || item.end_col() > u16::from(self.total_cols)
                {
                    return Err(CanvasValidationError::SpanOutOfBounds {
                        id: item.id.clone(),
                        col: item.position.col,
                        len: item.len,
                    });
                }

                let expected = row_index as u32 + 1;
                if item.position.row != expected {
                    return Err(CanvasValidationError::StaleRowNumber {
                        id: item.id.clone(),
                        expected,
                        actual: item.position.row,
                    });
                }

                if let Some(other) = row.items[offset + 1..]
                    .iter()
                    .find(|other| item.overlaps(other))
                {
                    return Err(CanvasValidationError::Overlap {
                        first: item.id.clone(),
                        second: other.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
