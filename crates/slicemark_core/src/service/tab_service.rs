//! Open-tab metadata service.
//!
//! # Responsibility
//! - Keep per-tab labels and colors in the `tabMetadata` document.
//! - Join host tab snapshots with stored metadata for display.
//!
//! # Invariants
//! - Metadata for a closed tab is removed, not kept for reuse.
//! - Tabs without stored metadata render with the default entry.

use crate::model::mark::{normalize_color, parse_labels, TabId, TabMetadata, TabMetadataMap, TabView};
use crate::search::filter::{filter_tabs, MarkQuery};
use crate::store::{load_document, save_document, DocumentStore, TAB_METADATA_KEY};
use log::info;

use super::mark_service::MarkServiceResult;

/// Tab as reported by the host browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTab {
    pub tab_id: TabId,
    pub index: u32,
    pub url: String,
    pub title: String,
}

/// Tab metadata facade over a document store.
pub struct TabService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> TabService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn metadata(&self) -> MarkServiceResult<TabMetadataMap> {
        Ok(load_document(&self.store, TAB_METADATA_KEY)?)
    }

    /// Replaces a tab's labels from comma-separated input, keeping its color.
    pub fn set_labels(&self, tab_id: TabId, input: &str) -> MarkServiceResult<TabMetadata> {
        let labels = parse_labels(input);
        self.update(tab_id, |entry| entry.labels = labels)
    }

    /// Sets a tab's color, keeping its labels.
    pub fn set_color(&self, tab_id: TabId, color: &str) -> MarkServiceResult<TabMetadata> {
        let color = normalize_color(color)?;
        self.update(tab_id, |entry| entry.color = color)
    }

    /// Drops metadata for a closed tab. Unknown ids are ignored.
    pub fn tab_closed(&self, tab_id: TabId) -> MarkServiceResult<()> {
        let mut metadata = self.metadata()?;
        if metadata.remove(&tab_id).is_some() {
            save_document(&self.store, TAB_METADATA_KEY, &metadata)?;
            info!("event=tab_metadata_remove module=tabs status=ok");
        }
        Ok(())
    }

    /// Joins host tabs with stored metadata, in strip order, keeping those
    /// that match `query`.
    pub fn tab_views(&self, tabs: Vec<HostTab>, query: &str) -> MarkServiceResult<Vec<TabView>> {
        let metadata = self.metadata()?;
        let mut views: Vec<TabView> = tabs
            .into_iter()
            .map(|tab| TabView {
                metadata: metadata.get(&tab.tab_id).cloned().unwrap_or_default(),
                tab_id: tab.tab_id,
                index: tab.index,
                url: tab.url,
                title: tab.title,
            })
            .collect();
        views.sort_by_key(|view| view.index);
        Ok(filter_tabs(&views, &MarkQuery::new(query))
            .into_iter()
            .cloned()
            .collect())
    }

    fn update<F>(&self, tab_id: TabId, apply: F) -> MarkServiceResult<TabMetadata>
    where
        F: FnOnce(&mut TabMetadata),
    {
        let mut metadata = self.metadata()?;
        let entry = metadata.entry(tab_id).or_default();
        apply(entry);
        let updated = entry.clone();
        save_document(&self.store, TAB_METADATA_KEY, &metadata)?;
        info!("event=tab_metadata_update module=tabs status=ok");
        Ok(updated)
    }
}
