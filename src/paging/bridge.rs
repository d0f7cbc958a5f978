use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::source::PagedItemSource;
use crate::core::viewmodels::Property;
use crate::models::{FilterOptions, RowItem, SortOption};

/// Observable page state written by [`ItemSourceBridge`]. Clones share values,
/// so the screen's view model can hold the same properties it hands the bridge.
#[derive(Debug, Clone)]
pub struct PageState {
    pub items: Property<Vec<RowItem>>,
    pub is_loading: Property<bool>,
    pub is_loading_more: Property<bool>,
    pub total_items: Property<usize>,
    pub error: Property<Option<String>>,
    pub filters: Property<FilterOptions>,
    pub sort: Property<SortOption>,
    pub start_letter: Property<Option<String>>,
}

impl PageState {
    pub fn new() -> Self {
        Self {
            items: Property::new(Vec::new(), "items"),
            is_loading: Property::new(false, "is_loading"),
            is_loading_more: Property::new(false, "is_loading_more"),
            total_items: Property::new(0, "total_items"),
            error: Property::new(None, "error"),
            filters: Property::new(FilterOptions::default(), "filters"),
            sort: Property::new(SortOption::default(), "sort"),
            start_letter: Property::new(None, "start_letter"),
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

/// Presents a callback-driven [`PagedItemSource`] as observable [`PageState`].
///
/// Every structural change from the source collapses to a full re-read of the
/// item list and total. First-page retrievals are tagged with a request id and
/// completions for anything but the latest id are dropped.
#[derive(Debug, Clone)]
pub struct ItemSourceBridge {
    source: Arc<dyn PagedItemSource>,
    state: PageState,
    latest_request: Arc<AtomicU64>,
    cancel: CancellationToken,
    observer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ItemSourceBridge {
    /// Wrap `source`, mirroring its query parameters into `state` and observing
    /// its changes until `cancel` fires or [`dispose`](Self::dispose) is called.
    pub async fn new(
        source: Arc<dyn PagedItemSource>,
        state: PageState,
        cancel: CancellationToken,
    ) -> Self {
        state.filters.set(source.filters().await).await;
        state.sort.set(source.sort().await).await;
        state.start_letter.set(source.start_letter().await).await;

        let bridge = Self {
            source,
            state,
            latest_request: Arc::new(AtomicU64::new(0)),
            cancel,
            observer: Arc::new(Mutex::new(None)),
        };

        let handle = bridge.spawn_observer();
        *bridge
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        bridge
    }

    fn spawn_observer(&self) -> JoinHandle<()> {
        let mut changes = self.source.subscribe();
        let this = self.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = this.cancel.cancelled() => break,
                    change = changes.recv() => match change {
                        Ok(change) => {
                            debug!("Source change: {:?}", change);
                            this.refresh_from_source().await;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("Missed {} source changes, re-reading", skipped);
                            this.refresh_from_source().await;
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            debug!("Stopped observing paged source");
        })
    }

    async fn refresh_from_source(&self) {
        let items = self.source.current_items().await;
        let total = self.source.total_count().await;
        debug!("Updated items: {} of {} in bridge", items.len(), total);
        self.state.items.set(items).await;
        self.state.total_items.set(total).await;
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Start a first-page fetch. Returns the request id tagging this retrieval.
    pub async fn retrieve(&self) -> u64 {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Starting retrieve #{}", request_id);
        self.state.is_loading.set(true).await;
        self.state.error.set(None).await;

        let this = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = this.cancel.cancelled() => {
                    debug!("Retrieve #{} cancelled", request_id);
                }
                result = this.source.retrieve_first_page() => {
                    this.finish_retrieve(request_id, result).await;
                }
            }
        });

        request_id
    }

    async fn finish_retrieve(&self, request_id: u64, result: anyhow::Result<()>) {
        if self.latest_request.load(Ordering::SeqCst) != request_id {
            debug!("Discarding result of superseded retrieve #{}", request_id);
            return;
        }

        match result {
            Ok(()) => {
                self.refresh_from_source().await;
                self.state.error.set(None).await;
                self.state.is_loading.set(false).await;
                debug!(
                    "Retrieve #{} finished: loaded={}, total={}",
                    request_id,
                    self.source.loaded_count().await,
                    self.state.total_items.get_sync()
                );
            }
            Err(e) => {
                error!("Failed to retrieve items: {:#}", e);
                self.state.error.set(Some(e.to_string())).await;
                self.state.is_loading.set(false).await;
            }
        }
    }

    /// Forward a scroll position to the source unless a load is already in
    /// flight. Returns whether the position was forwarded.
    pub async fn load_more_items_if_needed(&self, position: usize) -> bool {
        if self.state.is_loading.get_sync() || self.state.is_loading_more.get_sync() {
            debug!("Already loading, skipping load more for position {}", position);
            return false;
        }

        self.state.is_loading_more.set(true).await;
        let request_id = self.latest_request.load(Ordering::SeqCst);
        let this = self.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = this.cancel.cancelled() => return,
                result = this.source.load_more_if_needed(position) => result,
            };
            this.state.is_loading_more.set(false).await;

            if this.latest_request.load(Ordering::SeqCst) != request_id {
                debug!("Dropping page load for position {}, query changed", position);
                return;
            }
            match result {
                Ok(true) => this.refresh_from_source().await,
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to load more items at {}: {:#}", position, e);
                    this.state.error.set(Some(e.to_string())).await;
                }
            }
        });

        true
    }

    /// Retrieve again if the source reports stale data
    pub async fn re_retrieve_if_needed(&self) -> bool {
        if self.source.needs_refresh().await {
            self.retrieve().await;
            true
        } else {
            false
        }
    }

    pub async fn set_filters(&self, filters: FilterOptions) {
        self.source.set_filters(filters).await;
        self.state.filters.set(filters).await;
    }

    pub async fn set_sort(&self, sort: SortOption) {
        self.source.set_sort(sort.clone()).await;
        self.state.sort.set(sort).await;
    }

    pub async fn set_start_letter(&self, letter: Option<String>) {
        self.source.set_start_letter(letter.clone()).await;
        self.state.start_letter.set(letter).await;
    }

    /// Stop observing the source and cancel in-flight work
    pub fn dispose(&self) {
        self.cancel.cancel();
        let handle = self
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => handle.abort(),
            None => warn!("Bridge disposed twice"),
        }
    }
}
