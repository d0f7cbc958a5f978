use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::{FilterOptions, FolderId, ItemSortBy, RowItem, SortOption, SortOrder};

/// Structural change reported by a paged source. Consumers are free to treat
/// every variant as "re-read everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChange {
    Changed,
    RangeChanged { start: usize, count: usize },
    RangeInserted { start: usize, count: usize },
    RangeRemoved { start: usize, count: usize },
}

/// Chunked, server-backed list of row items with mutable query parameters.
///
/// Setters only change the query; callers retrieve afterwards.
#[async_trait]
pub trait PagedItemSource: Send + Sync + std::fmt::Debug {
    /// (Re)run the query from the first page, replacing loaded items
    async fn retrieve_first_page(&self) -> Result<()>;

    /// Fetch the next chunk if `position` is near the end of the loaded window.
    /// Returns whether a chunk was appended.
    async fn load_more_if_needed(&self, position: usize) -> Result<bool>;

    /// Whether loaded data is known to be out of date (for example after playback)
    async fn needs_refresh(&self) -> bool {
        false
    }

    async fn set_filters(&self, filters: FilterOptions);

    async fn filters(&self) -> FilterOptions;

    async fn set_sort(&self, sort: SortOption);

    async fn sort(&self) -> SortOption;

    async fn set_start_letter(&self, letter: Option<String>);

    async fn start_letter(&self) -> Option<String>;

    async fn current_items(&self) -> Vec<RowItem>;

    async fn total_count(&self) -> usize;

    async fn loaded_count(&self) -> usize;

    fn subscribe(&self) -> broadcast::Receiver<SourceChange>;
}

/// One page request against a library folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub parent_id: FolderId,
    pub start_index: usize,
    pub limit: usize,
    pub sort_by: ItemSortBy,
    pub sort_order: SortOrder,
    pub favorites_only: bool,
    pub unplayed_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_starts_with: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPage {
    pub items: Vec<RowItem>,
    pub total_record_count: usize,
}

/// Server API answering one page of items at a time
#[async_trait]
pub trait LibraryBackend: Send + Sync + std::fmt::Debug {
    async fn fetch_items(&self, query: &ItemQuery) -> Result<ItemPage>;
}
