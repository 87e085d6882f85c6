//! Case-insensitive substring filter over marks and tabs.
//!
//! # Invariants
//! - A blank query matches everything.
//! - Matching never reorders the input; results keep list order.

use crate::model::mark::{Bookmark, TabView, TextMark};

/// Normalized search query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkQuery {
    needle: String,
}

impl MarkQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.needle.is_empty()
    }

    fn hit(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }

    fn hit_any(&self, labels: &[String]) -> bool {
        labels.iter().any(|label| self.hit(label))
    }

    /// Matches url, title or any label.
    pub fn matches_bookmark(&self, bookmark: &Bookmark) -> bool {
        self.is_blank()
            || self.hit(&bookmark.url)
            || self.hit(&bookmark.title)
            || self.hit_any(&bookmark.labels)
    }

    /// Matches text or any label.
    pub fn matches_text_mark(&self, mark: &TextMark) -> bool {
        self.is_blank() || self.hit(&mark.text) || self.hit_any(&mark.labels)
    }

    /// Matches url, title or any custom label.
    pub fn matches_tab(&self, tab: &TabView) -> bool {
        self.is_blank()
            || self.hit(&tab.url)
            || self.hit(&tab.title)
            || self.hit_any(&tab.metadata.labels)
    }
}

/// Bookmarks matching `query`, in list order.
pub fn filter_bookmarks<'a>(bookmarks: &'a [Bookmark], query: &MarkQuery) -> Vec<&'a Bookmark> {
    bookmarks
        .iter()
        .filter(|bookmark| query.matches_bookmark(bookmark))
        .collect()
}

/// Text marks matching `query`, in list order.
pub fn filter_text_marks<'a>(marks: &'a [TextMark], query: &MarkQuery) -> Vec<&'a TextMark> {
    marks
        .iter()
        .filter(|mark| query.matches_text_mark(mark))
        .collect()
}

/// Tabs matching `query`, in strip order.
pub fn filter_tabs<'a>(tabs: &'a [TabView], query: &MarkQuery) -> Vec<&'a TabView> {
    tabs.iter().filter(|tab| query.matches_tab(tab)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookmark_matches_on_label_case_insensitively() {
        let mut bookmark = Bookmark::new("https://example.com", "Example");
        bookmark.labels = vec!["Reading".to_string()];
        assert!(MarkQuery::new("READ").matches_bookmark(&bookmark));
        assert!(MarkQuery::new("exam").matches_bookmark(&bookmark));
        assert!(!MarkQuery::new("missing").matches_bookmark(&bookmark));
    }

    #[test]
    fn blank_query_keeps_everything_in_order() {
        let marks = vec![TextMark::new("one"), TextMark::new("two")];
        let filtered = filter_text_marks(&marks, &MarkQuery::new("   "));
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].text, "one");
    }
}
