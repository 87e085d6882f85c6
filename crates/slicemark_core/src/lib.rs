//! SliceMark grid layout and reorder engine.
//!
//! Pure engines (`grid`) compute placements, reorders and resizes over the
//! canvas and mark models; services persist the results through a
//! whole-document store.

pub mod config;
pub mod db;
pub mod grid;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;
pub mod tagging;

pub use config::{ConfigError, SliceMarkConfig};
pub use grid::place::{insert_item, place, LayoutError, Placement, RowInsertPolicy};
pub use grid::reorder::{move_item, move_item_by_id, move_row, NoOpReason, ReorderOutcome};
pub use grid::resize::{pointer_delta_cols, resize, ResizeEdge, ResizeResult};
pub use grid::session::{
    ListDragSession, ListKind, ListMove, ResizeCommit, ResizeSession, ResizeTracker,
    RowDragSession, RowMove, SessionError,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::canvas::{Canvas, CanvasItem, CanvasRow, GridPosition, TOTAL_COLS};
pub use model::mark::{Bookmark, MarkRecord, TabMetadata, TabView, TextMark};
pub use service::canvas_service::{CanvasService, CanvasServiceError};
pub use service::mark_service::{MarkService, MarkServiceError, StoredMark};
pub use service::tab_service::{HostTab, TabService};
pub use store::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
