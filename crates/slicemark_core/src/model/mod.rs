//! Domain model for canvas cards and flat mark lists.
//!
//! # Responsibility
//! - Define the JSON document shapes persisted in the document store.
//! - Keep derived fields (row numbers) and read-time defaults next to data.
//!
//! # Invariants
//! - Every record is identified by a stable id, never by list position.
//! - Documents stay wire-compatible with the browser extension's storage.

pub mod canvas;
pub mod mark;
