//! In-process document store.
//!
//! Mirrors the host extension's local storage area: a flat map of keys to
//! JSON bodies. Used by tests and by embedders that sync documents to the
//! host themselves.

use super::{DocumentStore, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// `RefCell`-backed store; single-threaded like the UI event loop it serves.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RefCell<BTreeMap<String, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently holding a document, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.documents.borrow().keys().cloned().collect()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.documents.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, body: &str) -> StoreResult<()> {
        self.documents
            .borrow_mut()
            .insert(key.to_string(), body.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.documents.borrow_mut().remove(key);
        Ok(())
    }
}
