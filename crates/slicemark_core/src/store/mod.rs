//! Key-value document persistence.
//!
//! # Responsibility
//! - Define the opaque `get/set/remove` contract the engines persist through.
//! - Provide typed JSON load/save helpers with read-time fallbacks.
//!
//! # Invariants
//! - Documents are stored whole; there are no partial-document writes.
//! - A missing or malformed document reads as its `Default`, never as an
//!   error surfaced to the UI.
//! - Read-modify-write cycles are not guarded against interleaved writers:
//!   the last whole-document write wins.

use crate::db::DbError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Canvas grid document.
pub const CANVAS_KEY: &str = "canvas";
/// Flat bookmark list.
pub const BOOKMARKS_KEY: &str = "bookmarks";
/// Flat text snippet list.
pub const TEXTMARKS_KEY: &str = "textmarks";
/// Tab id -> labels/color map.
pub const TAB_METADATA_KEY: &str = "tabMetadata";
/// Card draft awaiting confirmation in the edit dialog.
pub const EDITING_ITEM_KEY: &str = "editingItem";
/// User configuration.
pub const SETTINGS_KEY: &str = "settings";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failures.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Document could not be encoded as JSON.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => {
                write!(f, "failed to encode document `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque whole-document store keyed by name.
pub trait DocumentStore {
    /// Returns the raw JSON body stored under `key`, if any.
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the whole document stored under `key`.
    fn set_raw(&self, key: &str, body: &str) -> StoreResult<()>;
    /// Deletes the document under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, body: &str) -> StoreResult<()> {
        (**self).set_raw(key, body)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// Loads and decodes the document under `key`.
///
/// Missing documents and documents that fail to decode both resolve to
/// `T::default()`; the latter logs a `document_malformed` warning.
pub fn load_document<T, S>(store: &S, key: &str) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
    S: DocumentStore + ?Sized,
{
    Ok(load_optional(store, key)?.unwrap_or_default())
}

/// Like [`load_document`] but keeps "absent or malformed" distinguishable.
pub fn load_optional<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    let Some(body) = store.get_raw(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&body) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(
                "event=document_malformed module=store status=fallback key={} line={} column={}",
                key,
                err.line(),
                err.column()
            );
            Ok(None)
        }
    }
}

/// Encodes `value` and stores it whole under `key`.
pub fn save_document<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: DocumentStore + ?Sized,
{
    let body = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_raw(key, &body)
}
