use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reel_browse::models::{FilterOptions, ItemKind, RowItem, SortOption};
use reel_browse::paging::{ItemPage, ItemQuery, LibraryBackend, PagedItemSource, SourceChange};
use reel_browse::services::{ItemLauncher, LaunchContext};
use std::sync::{Arc, Mutex};
use tokio::sync::{RwLock, broadcast};

/// In-memory paged source that records every query it was asked to run
#[derive(Debug)]
pub struct MockPagedSource {
    catalog: Vec<RowItem>,
    page_size: usize,
    filters: RwLock<FilterOptions>,
    sort: RwLock<SortOption>,
    start_letter: RwLock<Option<String>>,
    loaded: RwLock<Vec<RowItem>>,
    total: RwLock<usize>,
    pub retrieved_with: Mutex<Vec<FilterOptions>>,
    pub error_mode: Arc<Mutex<Option<String>>>,
    changes: broadcast::Sender<SourceChange>,
}

impl MockPagedSource {
    pub fn new(catalog: Vec<RowItem>, page_size: usize) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            page_size,
            filters: RwLock::new(FilterOptions::default()),
            sort: RwLock::new(SortOption::default()),
            start_letter: RwLock::new(None),
            loaded: RwLock::new(Vec::new()),
            total: RwLock::new(0),
            retrieved_with: Mutex::new(Vec::new()),
            error_mode: Arc::new(Mutex::new(None)),
            changes: broadcast::channel(16).0,
        })
    }

    pub fn inject_error(&self, error: &str) {
        *self.error_mode.lock().unwrap() = Some(error.to_string());
    }

    pub fn clear_error(&self) {
        *self.error_mode.lock().unwrap() = None;
    }

    pub fn retrievals(&self) -> Vec<FilterOptions> {
        self.retrieved_with.lock().unwrap().clone()
    }

    async fn matching(&self) -> Vec<RowItem> {
        let filters = *self.filters.read().await;
        let letter = self.start_letter.read().await.clone();
        self.catalog
            .iter()
            .filter(|item| !filters.favorite_only || item.is_favorite)
            .filter(|item| !filters.unwatched_only || !item.played)
            .filter(|item| {
                letter
                    .as_deref()
                    .is_none_or(|l| item.name.to_uppercase() >= l.to_uppercase())
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PagedItemSource for MockPagedSource {
    async fn retrieve_first_page(&self) -> Result<()> {
        let current_filters = *self.filters.read().await;
        self.retrieved_with.lock().unwrap().push(current_filters);
        if let Some(error) = self.error_mode.lock().unwrap().clone() {
            return Err(anyhow!(error));
        }

        let matching = self.matching().await;
        *self.total.write().await = matching.len();
        *self.loaded.write().await = matching.into_iter().take(self.page_size).collect();
        Ok(())
    }

    async fn load_more_if_needed(&self, _position: usize) -> Result<bool> {
        let matching = self.matching().await;
        let mut loaded = self.loaded.write().await;
        if loaded.len() >= matching.len() {
            return Ok(false);
        }
        let start = loaded.len();
        loaded.extend(matching.into_iter().skip(start).take(self.page_size));
        let count = loaded.len() - start;
        drop(loaded);

        let _ = self.changes.send(SourceChange::RangeInserted { start, count });
        Ok(true)
    }

    async fn set_filters(&self, filters: FilterOptions) {
        *self.filters.write().await = filters;
    }

    async fn filters(&self) -> FilterOptions {
        *self.filters.read().await
    }

    async fn set_sort(&self, sort: SortOption) {
        *self.sort.write().await = sort;
    }

    async fn sort(&self) -> SortOption {
        self.sort.read().await.clone()
    }

    async fn set_start_letter(&self, letter: Option<String>) {
        *self.start_letter.write().await = letter;
    }

    async fn start_letter(&self) -> Option<String> {
        self.start_letter.read().await.clone()
    }

    async fn current_items(&self) -> Vec<RowItem> {
        self.loaded.read().await.clone()
    }

    async fn total_count(&self) -> usize {
        *self.total.read().await
    }

    async fn loaded_count(&self) -> usize {
        self.loaded.read().await.len()
    }

    fn subscribe(&self) -> broadcast::Receiver<SourceChange> {
        self.changes.subscribe()
    }
}

/// Server stand-in for the chunked source
#[derive(Debug, Default)]
pub struct MockBackend {
    pub total: usize,
    pub queries: Mutex<Vec<ItemQuery>>,
}

impl MockBackend {
    pub fn new(total: usize) -> Arc<Self> {
        Arc::new(Self {
            total,
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LibraryBackend for MockBackend {
    async fn fetch_items(&self, query: &ItemQuery) -> Result<ItemPage> {
        self.queries.lock().unwrap().push(query.clone());
        let end = (query.start_index + query.limit).min(self.total);
        Ok(ItemPage {
            items: (query.start_index..end)
                .map(|i| RowItem::new(format!("movie-{i}"), ItemKind::Movie, format!("Movie {i}")))
                .collect(),
            total_record_count: self.total,
        })
    }
}

#[derive(Debug, Default)]
pub struct MockLauncher {
    pub launched: Mutex<Vec<(String, LaunchContext)>>,
}

#[async_trait]
impl ItemLauncher for MockLauncher {
    async fn launch(&self, item: &RowItem, context: LaunchContext) -> Result<()> {
        self.launched
            .lock()
            .unwrap()
            .push((item.id.to_string(), context));
        Ok(())
    }
}

/// Catalog of `count` movies; every third is a favorite, every other one watched
pub fn catalog(count: usize) -> Vec<RowItem> {
    (0..count)
        .map(|i| {
            let mut item = RowItem::new(format!("m{i}"), ItemKind::Movie, format!("Movie {i:03}"));
            item.is_favorite = i % 3 == 0;
            item.played = i % 2 == 1;
            item
        })
        .collect()
}
