//! Two-level bookmark tree grouped by domain, then path.
//!
//! # Invariants
//! - Both levels are sorted by key.
//! - Bookmarks keep their list order inside one leaf.
//! - Missing segments group under [`UNCATEGORIZED`].

use super::url_segments::UrlSegments;
use crate::model::mark::Bookmark;
use std::collections::BTreeMap;

/// Group label for bookmarks with no usable domain or path.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Bookmarks sharing one domain, grouped by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainGroup<'a> {
    pub domain: String,
    pub paths: Vec<PathGroup<'a>>,
}

/// Bookmarks sharing one domain and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGroup<'a> {
    pub path: String,
    pub bookmarks: Vec<&'a Bookmark>,
}

/// Builds the domain -> path -> bookmarks tree.
pub fn build_tag_tree(bookmarks: &[Bookmark]) -> Vec<DomainGroup<'_>> {
    let mut tree: BTreeMap<String, BTreeMap<String, Vec<&Bookmark>>> = BTreeMap::new();
    for bookmark in bookmarks {
        let segments = UrlSegments::parse(&bookmark.url);
        let domain = non_empty_or_uncategorized(segments.domain);
        let path = non_empty_or_uncategorized(segments.path);
        tree.entry(domain)
            .or_default()
            .entry(path)
            .or_default()
            .push(bookmark);
    }

    tree.into_iter()
        .map(|(domain, paths)| DomainGroup {
            domain,
            paths: paths
                .into_iter()
                .map(|(path, bookmarks)| PathGroup { path, bookmarks })
                .collect(),
        })
        .collect()
}

fn non_empty_or_uncategorized(value: String) -> String {
    if value.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        value
    }
}
