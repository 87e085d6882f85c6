//! Grid layout and reorder engine.
//!
//! # Responsibility
//! - First-fit placement of new cards (`place`).
//! - Row-level and list-level drag reorder (`reorder`).
//! - Edge-drag resize inside a row (`resize`).
//! - Caller-owned gesture sessions feeding the engines (`session`).
//!
//! # Invariants
//! - Engines are pure, synchronous transforms over in-memory documents.
//! - No-op outcomes leave documents untouched.

pub mod place;
pub mod reorder;
pub mod resize;
pub mod session;
