//! Canvas use-case service.
//!
//! # Responsibility
//! - Run every canvas mutation as a whole-document read-modify-write.
//! - Own the capture/edit draft flow that feeds new cards onto the grid.
//!
//! # Invariants
//! - Each mutation loads the latest canvas, applies one engine call, stores
//!   the whole document and returns what was stored.
//! - No-op engine outcomes skip the store write.
//! - Stored canvases never contain empty rows.

use crate::config::SliceMarkConfig;
use crate::grid::place::{check_span, insert_item, place, LayoutError, Placement};
use crate::grid::reorder::{move_row, ReorderOutcome};
use crate::grid::resize::apply_resize;
use crate::grid::session::{ResizeCommit, RowMove};
use crate::model::canvas::{Canvas, CanvasItem, CardId, GridPosition, TOTAL_COLS};
use crate::store::{
    load_document, load_optional, save_document, DocumentStore, StoreError, StoreResult,
    CANVAS_KEY, EDITING_ITEM_KEY,
};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from canvas use-cases.
#[derive(Debug)]
pub enum CanvasServiceError {
    /// Card span rejected before placement.
    Layout(LayoutError),
    /// No card with this id on the canvas.
    ItemNotFound(CardId),
    /// `save_staged` called without a staged draft.
    NoStagedItem,
    Store(StoreError),
}

impl Display for CanvasServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "canvas card not found: {id}"),
            Self::NoStagedItem => write!(f, "no captured card is awaiting edit"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CanvasServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for CanvasServiceError {
    fn from(value: LayoutError) -> Self {
        Self::Layout(value)
    }
}

impl From<StoreError> for CanvasServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type CanvasServiceResult<T> = Result<T, CanvasServiceError>;

/// Canvas service facade over a document store.
pub struct CanvasService<S: DocumentStore> {
    store: S,
    config: SliceMarkConfig,
}

impl<S: DocumentStore> CanvasService<S> {
    /// Creates a service with explicit configuration.
    pub fn new(store: S, config: SliceMarkConfig) -> Self {
        Self { store, config }
    }

    /// Creates a service using the config persisted in `store`.
    pub fn from_store(store: S) -> StoreResult<Self> {
        let config = SliceMarkConfig::load(&store)?;
        Ok(Self::new(store, config))
    }

    pub fn config(&self) -> &SliceMarkConfig {
        &self.config
    }

    /// Loads the latest canvas, compacted and renumbered.
    ///
    /// A stored grid width other than [`TOTAL_COLS`] is reset to it.
    pub fn load_canvas(&self) -> StoreResult<Canvas> {
        let mut canvas: Canvas = load_document(&self.store, CANVAS_KEY)?;
        if canvas.total_cols != TOTAL_COLS {
            warn!(
                "event=document_malformed module=canvas status=fallback total_cols={} expected={TOTAL_COLS}",
                canvas.total_cols
            );
            canvas.total_cols = TOTAL_COLS;
        }
        canvas.compact();
        Ok(canvas)
    }

    /// Where a card of span `len` would land, without mutating anything.
    pub fn preview_placement(&self, len: u8) -> CanvasServiceResult<Placement> {
        let canvas = self.load_canvas()?;
        Ok(place(&canvas, len)?)
    }

    /// Places a new card and persists the canvas.
    ///
    /// Blank `text` is replaced by the configured default text.
    ///
    /// # Errors
    /// - [`CanvasServiceError::Layout`] when `len` is outside `[1, 5]`.
    pub fn add_item(
        &self,
        url: impl Into<String>,
        text: &str,
        len: u8,
    ) -> CanvasServiceResult<CanvasItem> {
        let mut item = CanvasItem::new(url, self.resolve_text(text));
        item.len = len;
        self.insert(item)
    }

    /// Stores a draft card for `url` awaiting the edit dialog.
    pub fn stage_capture(&self, url: impl Into<String>) -> CanvasServiceResult<CanvasItem> {
        let mut draft = CanvasItem::new(url, self.config.default_item_text.clone());
        draft.len = self.config.default_item_len;
        save_document(&self.store, EDITING_ITEM_KEY, &draft)?;
        info!("event=canvas_capture_stage module=canvas status=ok");
        Ok(draft)
    }

    /// Returns the staged draft, if one is waiting.
    pub fn staged_capture(&self) -> StoreResult<Option<CanvasItem>> {
        load_optional(&self.store, EDITING_ITEM_KEY)
    }

    /// Confirms the staged draft with edited text and span, places it and
    /// clears the draft.
    ///
    /// # Errors
    /// - [`CanvasServiceError::NoStagedItem`] when nothing is staged.
    /// - [`CanvasServiceError::Layout`] when `len` is outside `[1, 5]`; the
    ///   draft stays staged so the dialog can be corrected.
    pub fn save_staged(&self, text: &str, len: u8) -> CanvasServiceResult<CanvasItem> {
        let mut draft = self
            .staged_capture()?
            .ok_or(CanvasServiceError::NoStagedItem)?;
        check_span(len, TOTAL_COLS)?;

        draft.text = self.resolve_text(text);
        draft.len = len;
        draft.position = GridPosition::default();
        let placed = self.insert(draft)?;
        self.store.remove(EDITING_ITEM_KEY)?;
        Ok(placed)
    }

    /// Discards the staged draft.
    pub fn discard_staged(&self) -> StoreResult<()> {
        self.store.remove(EDITING_ITEM_KEY)
    }

    /// Deletes one card and compacts empty rows.
    pub fn delete_item(&self, id: &str) -> CanvasServiceResult<Canvas> {
        let mut canvas = self.load_canvas()?;
        let rows_before = canvas.rows.len();
        canvas
            .remove_item(id)
            .ok_or_else(|| CanvasServiceError::ItemNotFound(id.to_string()))?;
        save_document(&self.store, CANVAS_KEY, &canvas)?;
        info!(
            "event=canvas_item_delete module=canvas status=ok row_removed={}",
            canvas.rows.len() != rows_before
        );
        Ok(canvas)
    }

    /// Applies a finished row drag.
    pub fn move_row(&self, row_move: RowMove) -> CanvasServiceResult<ReorderOutcome> {
        let mut canvas = self.load_canvas()?;
        let outcome = move_row(
            &mut canvas,
            row_move.source,
            row_move.target,
            row_move.insert_after,
        );
        match outcome {
            ReorderOutcome::Moved { from, to } => {
                save_document(&self.store, CANVAS_KEY, &canvas)?;
                info!("event=canvas_row_move module=canvas status=ok from={from} to={to}");
            }
            ReorderOutcome::Unchanged(reason) => {
                debug!("event=canvas_row_move module=canvas status=noop reason={reason:?}");
            }
        }
        Ok(outcome)
    }

    /// Applies a finished resize gesture to the card it started on.
    ///
    /// Unchanged commits skip the store write.
    ///
    /// # Errors
    /// - [`CanvasServiceError::ItemNotFound`] when the card was deleted
    ///   mid-gesture.
    pub fn commit_resize(&self, commit: &ResizeCommit) -> CanvasServiceResult<CanvasItem> {
        let mut canvas = self.load_canvas()?;
        if !commit.changed {
            debug!("event=canvas_item_resize module=canvas status=noop");
            return canvas
                .find_item(&commit.item_id)
                .map(|(_, item)| item.clone())
                .ok_or_else(|| CanvasServiceError::ItemNotFound(commit.item_id.clone()));
        }
        if !apply_resize(&mut canvas, &commit.item_id, commit.result) {
            return Err(CanvasServiceError::ItemNotFound(commit.item_id.clone()));
        }
        save_document(&self.store, CANVAS_KEY, &canvas)?;
        info!(
            "event=canvas_item_resize module=canvas status=ok col={} len={}",
            commit.result.col, commit.result.len
        );
        canvas
            .find_item(&commit.item_id)
            .map(|(_, item)| item.clone())
            .ok_or_else(|| CanvasServiceError::ItemNotFound(commit.item_id.clone()))
    }

    fn insert(&self, item: CanvasItem) -> CanvasServiceResult<CanvasItem> {
        let mut canvas = self.load_canvas()?;
        let id = item.id.clone();
        let placement = insert_item(&mut canvas, item, self.config.row_insert_policy)?;
        if placement.need_new_row {
            canvas.rows[placement.target_row_index].height = self.config.default_row_height;
        }
        save_document(&self.store, CANVAS_KEY, &canvas)?;
        info!(
            "event=canvas_item_add module=canvas status=ok row={} col={} new_row={}",
            placement.target_row_index + 1,
            placement.target_col,
            placement.need_new_row
        );

        canvas
            .find_item(&id)
            .map(|(_, item)| item.clone())
            .ok_or(CanvasServiceError::ItemNotFound(id))
    }

    fn resolve_text(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.config.default_item_text.clone()
        } else {
            trimmed.to_string()
        }
    }
}
