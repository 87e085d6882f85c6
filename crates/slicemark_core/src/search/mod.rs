//! In-memory search over mark lists.

pub mod filter;
