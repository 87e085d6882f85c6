//! Bookmark and text mark use-case service.
//!
//! # Responsibility
//! - Add, delete, label, color and reorder the two flat mark lists.
//! - Upgrade legacy records to the current schema when lists are read.
//!
//! # Invariants
//! - Bookmark urls are unique within the bookmark list.
//! - Text mark texts are unique within the text mark list.
//! - Every write stores the whole list document.

use crate::config::SliceMarkConfig;
use crate::grid::reorder::{move_item, move_item_by_id, ReorderOutcome};
use crate::grid::session::{ListKind, ListMove};
use crate::model::mark::{
    normalize_color, parse_labels, Bookmark, MarkId, MarkRecord, MarkValidationError, TextMark,
    DEFAULT_MARK_COLOR,
};
use crate::search::filter::{filter_bookmarks, filter_text_marks, MarkQuery};
use crate::store::{
    load_document, save_document, DocumentStore, StoreError, BOOKMARKS_KEY, TEXTMARKS_KEY,
};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mark list stored as one document.
pub trait StoredMark: MarkRecord + Clone + Serialize + DeserializeOwned {
    /// Store key of the list document.
    const STORE_KEY: &'static str;
    /// Drag list this record type is rendered in.
    const LIST_KIND: ListKind;
}

impl StoredMark for Bookmark {
    const STORE_KEY: &'static str = BOOKMARKS_KEY;
    const LIST_KIND: ListKind = ListKind::Bookmarks;
}

impl StoredMark for TextMark {
    const STORE_KEY: &'static str = TEXTMARKS_KEY;
    const LIST_KIND: ListKind = ListKind::TextMarks;
}

/// Errors from mark use-cases.
#[derive(Debug)]
pub enum MarkServiceError {
    /// Url is blank after trim.
    InvalidUrl,
    /// Text is blank after trim.
    InvalidText,
    DuplicateBookmark(String),
    DuplicateTextMark(String),
    MarkNotFound(MarkId),
    /// A list move was routed to the wrong list.
    WrongList {
        expected: ListKind,
        actual: ListKind,
    },
    Validation(MarkValidationError),
    Store(StoreError),
}

impl Display for MarkServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "bookmark url must not be blank"),
            Self::InvalidText => write!(f, "text mark must not be blank"),
            Self::DuplicateBookmark(url) => write!(f, "bookmark already exists: {url}"),
            Self::DuplicateTextMark(_) => write!(f, "text mark already exists"),
            Self::MarkNotFound(id) => write!(f, "mark not found: {id}"),
            Self::WrongList { expected, actual } => {
                write!(f, "list move for {actual:?} sent to {expected:?}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MarkServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MarkValidationError> for MarkServiceError {
    fn from(value: MarkValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for MarkServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type MarkServiceResult<T> = Result<T, MarkServiceError>;

/// Mark service facade over a document store.
pub struct MarkService<S: DocumentStore> {
    store: S,
    default_color: String,
}

impl<S: DocumentStore> MarkService<S> {
    /// Creates a service giving new marks [`DEFAULT_MARK_COLOR`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_color: DEFAULT_MARK_COLOR.to_string(),
        }
    }

    /// Creates a service using the default color from stored settings.
    pub fn from_store(store: S) -> MarkServiceResult<Self> {
        let config = SliceMarkConfig::load(&store)?;
        Ok(Self {
            store,
            default_color: normalize_color(&config.default_mark_color)?,
        })
    }

    /// Loads one mark list with every record upgraded.
    ///
    /// Upgraded records (new ids, normalized legacy fields) are written back
    /// before returning, so listed ids stay valid for later calls.
    pub fn list<T: StoredMark>(&self) -> MarkServiceResult<Vec<T>> {
        let mut marks: Vec<T> = load_document(&self.store, T::STORE_KEY)?;
        let upgraded = marks.iter_mut().fold(0usize, |count, mark| {
            count + usize::from(mark.upgrade())
        });
        if upgraded > 0 {
            save_document(&self.store, T::STORE_KEY, &marks)?;
            info!(
                "event=mark_upgrade module=marks status=ok list={:?} upgraded={upgraded}",
                T::LIST_KIND
            );
        }
        Ok(marks)
    }

    /// Bookmarks matching `query`, in list order.
    pub fn search_bookmarks(&self, query: &str) -> MarkServiceResult<Vec<Bookmark>> {
        let bookmarks = self.list::<Bookmark>()?;
        Ok(filter_bookmarks(&bookmarks, &MarkQuery::new(query))
            .into_iter()
            .cloned()
            .collect())
    }

    /// Text marks matching `query`, in list order.
    pub fn search_text_marks(&self, query: &str) -> MarkServiceResult<Vec<TextMark>> {
        let marks = self.list::<TextMark>()?;
        Ok(filter_text_marks(&marks, &MarkQuery::new(query))
            .into_iter()
            .cloned()
            .collect())
    }

    /// Appends a bookmark.
    ///
    /// # Errors
    /// - [`MarkServiceError::InvalidUrl`] for a blank url.
    /// - [`MarkServiceError::DuplicateBookmark`] when the url is already saved.
    pub fn add_bookmark(&self, url: &str, title: &str) -> MarkServiceResult<Bookmark> {
        let url = url.trim();
        if url.is_empty() {
            return Err(MarkServiceError::InvalidUrl);
        }
        let mut bookmarks = self.list::<Bookmark>()?;
        if bookmarks.iter().any(|bookmark| bookmark.url == url) {
            debug!("event=bookmark_add module=marks status=duplicate");
            return Err(MarkServiceError::DuplicateBookmark(url.to_string()));
        }

        let mut bookmark = Bookmark::new(url, title.trim());
        bookmark.color = self.default_color.clone();
        bookmarks.push(bookmark.clone());
        save_document(&self.store, BOOKMARKS_KEY, &bookmarks)?;
        info!(
            "event=bookmark_add module=marks status=ok count={}",
            bookmarks.len()
        );
        Ok(bookmark)
    }

    /// Appends a text snippet.
    ///
    /// # Errors
    /// - [`MarkServiceError::InvalidText`] for blank text.
    /// - [`MarkServiceError::DuplicateTextMark`] when the text is already saved.
    pub fn add_text_mark(&self, text: &str) -> MarkServiceResult<TextMark> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MarkServiceError::InvalidText);
        }
        let mut marks = self.list::<TextMark>()?;
        if marks.iter().any(|mark| mark.text == text) {
            debug!("event=textmark_add module=marks status=duplicate");
            return Err(MarkServiceError::DuplicateTextMark(text.to_string()));
        }

        let mut mark = TextMark::new(text);
        mark.color = self.default_color.clone();
        marks.push(mark.clone());
        save_document(&self.store, TEXTMARKS_KEY, &marks)?;
        info!(
            "event=textmark_add module=marks status=ok count={}",
            marks.len()
        );
        Ok(mark)
    }

    /// Removes one record by id.
    pub fn delete<T: StoredMark>(&self, id: &str) -> MarkServiceResult<T> {
        let mut marks = self.list::<T>()?;
        let index = marks
            .iter()
            .position(|mark| mark.id() == id)
            .ok_or_else(|| MarkServiceError::MarkNotFound(id.to_string()))?;
        let removed = marks.remove(index);
        save_document(&self.store, T::STORE_KEY, &marks)?;
        info!(
            "event=mark_delete module=marks status=ok list={:?}",
            T::LIST_KIND
        );
        Ok(removed)
    }

    /// Replaces labels from comma-separated user input.
    pub fn set_labels<T: StoredMark>(&self, id: &str, input: &str) -> MarkServiceResult<T> {
        let labels = parse_labels(input);
        self.update(id, |mark: &mut T| mark.set_labels(labels))
    }

    /// Sets the display color; accepts `#rgb` or `#rrggbb`.
    pub fn set_color<T: StoredMark>(&self, id: &str, color: &str) -> MarkServiceResult<T> {
        let color = normalize_color(color)?;
        self.update(id, |mark: &mut T| mark.set_color(color))
    }

    /// Applies a finished list drag.
    ///
    /// # Errors
    /// - [`MarkServiceError::WrongList`] when `list_move` belongs to another list.
    pub fn reorder<T: StoredMark>(&self, list_move: &ListMove) -> MarkServiceResult<ReorderOutcome> {
        if list_move.kind != T::LIST_KIND {
            return Err(MarkServiceError::WrongList {
                expected: T::LIST_KIND,
                actual: list_move.kind,
            });
        }
        let mut marks = self.list::<T>()?;
        let outcome = move_item_by_id(
            &mut marks,
            &list_move.dragged_id,
            &list_move.target_id,
            list_move.insert_before,
        );
        self.finish_reorder::<T>(&marks, outcome)
    }

    /// Reorders by natural key (url or text) for callers without ids.
    pub fn reorder_by_key<T: StoredMark>(
        &self,
        dragged_key: &str,
        target_key: &str,
        insert_before: bool,
    ) -> MarkServiceResult<ReorderOutcome> {
        let mut marks = self.list::<T>()?;
        let outcome = move_item(&mut marks, dragged_key, target_key, insert_before);
        self.finish_reorder::<T>(&marks, outcome)
    }

    fn update<T, F>(&self, id: &str, apply: F) -> MarkServiceResult<T>
    where
        T: StoredMark,
        F: FnOnce(&mut T),
    {
        let mut marks = self.list::<T>()?;
        let mark = marks
            .iter_mut()
            .find(|mark| mark.id() == id)
            .ok_or_else(|| MarkServiceError::MarkNotFound(id.to_string()))?;
        apply(mark);
        let updated = mark.clone();
        save_document(&self.store, T::STORE_KEY, &marks)?;
        info!(
            "event=mark_update module=marks status=ok list={:?}",
            T::LIST_KIND
        );
        Ok(updated)
    }

    fn finish_reorder<T: StoredMark>(
        &self,
        marks: &[T],
        outcome: ReorderOutcome,
    ) -> MarkServiceResult<ReorderOutcome> {
        match outcome {
            ReorderOutcome::Moved { from, to } => {
                save_document(&self.store, T::STORE_KEY, marks)?;
                info!(
                    "event=mark_reorder module=marks status=ok list={:?} from={from} to={to}",
                    T::LIST_KIND
                );
            }
            ReorderOutcome::Unchanged(reason) => {
                debug!(
                    "event=mark_reorder module=marks status=noop list={:?} reason={reason:?}",
                    T::LIST_KIND
                );
            }
        }
        Ok(outcome)
    }
}
