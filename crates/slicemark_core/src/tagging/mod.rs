//! URL-derived tagging for bookmarks.
//!
//! # Responsibility
//! - Split URLs into domain/path/params segments.
//! - Group bookmarks into a sorted domain -> path tree.

pub mod tag_tree;
pub mod url_segments;
