use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use super::source::{ItemPage, ItemQuery, LibraryBackend, PagedItemSource, SourceChange};
use crate::config::PagingConfig;
use crate::models::{FilterOptions, FolderId, RowItem, SortOption};
use crate::utils::BrowseError;

#[derive(Debug, Default)]
struct ChunkState {
    items: Vec<RowItem>,
    total: usize,
    filters: FilterOptions,
    sort: SortOption,
    start_letter: Option<String>,
    stale: bool,
}

/// Pages a folder's items from a [`LibraryBackend`] in fixed-size chunks.
///
/// Every first-page retrieval bumps a generation counter; pages fetched for an
/// older generation are dropped, so overlapping retrievals are harmless.
#[derive(Debug)]
pub struct ChunkedItemSource {
    backend: Arc<dyn LibraryBackend>,
    folder_id: FolderId,
    chunk_size: usize,
    fetch_distance: usize,
    state: RwLock<ChunkState>,
    generation: AtomicU64,
    fetching_more: AtomicBool,
    changes: broadcast::Sender<SourceChange>,
}

impl ChunkedItemSource {
    pub fn new(backend: Arc<dyn LibraryBackend>, folder_id: FolderId, paging: &PagingConfig) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            backend,
            folder_id,
            chunk_size: paging.chunk_size.max(1),
            fetch_distance: paging.fetch_distance,
            state: RwLock::new(ChunkState::default()),
            generation: AtomicU64::new(0),
            fetching_more: AtomicBool::new(false),
            changes,
        }
    }

    /// Flag loaded data as outdated; the next `needs_refresh` check reports it
    pub async fn mark_stale(&self) {
        self.state.write().await.stale = true;
    }

    fn query(&self, state: &ChunkState, start_index: usize) -> ItemQuery {
        ItemQuery {
            parent_id: self.folder_id.clone(),
            start_index,
            limit: self.chunk_size,
            sort_by: state.sort.sort_by,
            sort_order: state.sort.order,
            favorites_only: state.filters.favorite_only,
            unplayed_only: state.filters.unwatched_only,
            name_starts_with: state.start_letter.clone(),
        }
    }

    async fn fetch(&self, query: &ItemQuery) -> Result<ItemPage> {
        self.backend.fetch_items(query).await.map_err(|e| {
            BrowseError::Backend(format!(
                "items {}..{} of {}: {:#}",
                query.start_index,
                query.start_index + query.limit,
                self.folder_id,
                e
            ))
            .into()
        })
    }

    fn notify(&self, change: SourceChange) {
        // No receivers is fine; nobody is observing yet
        let _ = self.changes.send(change);
    }
}

#[async_trait]
impl PagedItemSource for ChunkedItemSource {
    async fn retrieve_first_page(&self) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.query(&*self.state.read().await, 0);

        debug!(
            "Retrieving first page for {} (generation {})",
            self.folder_id, generation
        );
        let page = self.fetch(&query).await?;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Dropping first page of superseded generation {}", generation);
            return Ok(());
        }

        let count = page.items.len();
        {
            let mut state = self.state.write().await;
            state.items = page.items;
            state.total = page.total_record_count.max(count);
            state.stale = false;
        }
        info!(
            "Loaded {} of {} items for {}",
            count, page.total_record_count, self.folder_id
        );
        self.notify(SourceChange::Changed);
        Ok(())
    }

    async fn load_more_if_needed(&self, position: usize) -> Result<bool> {
        let (query, generation) = {
            let state = self.state.read().await;
            let loaded = state.items.len();
            if loaded >= state.total {
                return Ok(false);
            }
            if position.saturating_add(self.fetch_distance) < loaded {
                return Ok(false);
            }
            (self.query(&state, loaded), self.generation.load(Ordering::SeqCst))
        };

        if self.fetching_more.swap(true, Ordering::SeqCst) {
            debug!("Chunk fetch already in flight, ignoring position {}", position);
            return Ok(false);
        }

        debug!(
            "Fetching chunk at {} for position {}",
            query.start_index, position
        );
        let result = self.fetch(&query).await;
        self.fetching_more.store(false, Ordering::SeqCst);
        let page = result?;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation
            || state.items.len() != query.start_index
        {
            debug!("Dropping chunk at {}, query changed meanwhile", query.start_index);
            return Ok(false);
        }

        let count = page.items.len();
        if count == 0 {
            // Server reported more items than it will return; stop paging here
            warn!(
                "Empty chunk at {} of {} for {}",
                query.start_index, state.total, self.folder_id
            );
            state.total = state.items.len();
            drop(state);
            self.notify(SourceChange::Changed);
            return Ok(false);
        }

        state.items.extend(page.items);
        state.total = page.total_record_count.max(state.items.len());
        drop(state);

        self.notify(SourceChange::RangeInserted {
            start: query.start_index,
            count,
        });
        Ok(true)
    }

    async fn needs_refresh(&self) -> bool {
        self.state.read().await.stale
    }

    async fn set_filters(&self, filters: FilterOptions) {
        self.state.write().await.filters = filters;
    }

    async fn filters(&self) -> FilterOptions {
        self.state.read().await.filters
    }

    async fn set_sort(&self, sort: SortOption) {
        self.state.write().await.sort = sort;
    }

    async fn sort(&self) -> SortOption {
        self.state.read().await.sort.clone()
    }

    async fn set_start_letter(&self, letter: Option<String>) {
        self.state.write().await.start_letter = letter;
    }

    async fn start_letter(&self) -> Option<String> {
        self.state.read().await.start_letter.clone()
    }

    async fn current_items(&self) -> Vec<RowItem> {
        self.state.read().await.items.clone()
    }

    async fn total_count(&self) -> usize {
        self.state.read().await.total
    }

    async fn loaded_count(&self) -> usize {
        self.state.read().await.items.len()
    }

    fn subscribe(&self) -> broadcast::Receiver<SourceChange> {
        self.changes.subscribe()
    }
}
