use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::property::{ComputedProperty, PropertyLike};
use super::{Property, PropertySubscriber, ViewModel};
use crate::config::PagingConfig;
use crate::models::{
    FilterOptions, Folder, GridDirection, ImageType, LibraryViewPreferences, PosterSize, RowItem,
    SortOption, sort_options_for,
};
use crate::paging::{ChunkedItemSource, ItemSourceBridge, LibraryBackend, PageState, PagedItemSource};
use crate::services::{
    DisplayPreferencesNavigator, ItemLauncher, LaunchContext, LibraryPreferences, PreferenceStore,
};
use crate::utils::BrowseError;

/// State holder for one library browse screen.
///
/// Construction reads view preferences synchronously; items arrive once
/// [`initialize_adapter`](Self::initialize_adapter) wires a paged source.
/// Filter and sort changes always persist, then reach the source, then
/// retrieve, and only then show up in the observable state.
///
/// Must be created inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct BrowseGridViewModel {
    folder: Folder,
    preferences: Arc<LibraryPreferences>,
    launcher: Arc<dyn ItemLauncher>,
    paging: PagingConfig,
    scope: CancellationToken,
    bridge: Arc<OnceLock<ItemSourceBridge>>,
    adapter_initialized: Arc<AtomicBool>,

    page: PageState,
    poster_size: Property<PosterSize>,
    image_type: Property<ImageType>,
    grid_direction: Property<GridDirection>,
    favorite_only: Property<bool>,
    unwatched_only: Property<bool>,
    sort_option: Property<SortOption>,
    selected_index: Property<usize>,
    /// Bumped whenever the grid should scroll back to the top and refocus
    reset_generation: Property<u64>,
    status_text: Arc<ComputedProperty<Option<String>>>,
}

impl BrowseGridViewModel {
    pub fn new(
        folder: Folder,
        store: Arc<dyn PreferenceStore>,
        launcher: Arc<dyn ItemLauncher>,
        paging: PagingConfig,
    ) -> Result<Self, BrowseError> {
        if folder.id.is_empty() {
            return Err(BrowseError::MissingArgument("folder"));
        }

        let preferences = LibraryPreferences::open(store, folder.preferences_key())
            .map_err(|e| BrowseError::Preferences(format!("{:#}", e)))?;
        let prefs = preferences.get();
        info!(
            "Browsing {} ({:?}) with {:?} {:?} {:?}",
            folder.name, folder.collection_type, prefs.poster_size, prefs.image_type,
            prefs.grid_direction
        );

        let page = PageState::new();
        let selected_index = Property::new(0usize, "selected_index");
        let status_text = Arc::new(Self::status_property(&selected_index, &page));
        let sort_option =
            SortOption::from_persisted(prefs.sort_by, prefs.sort_order, folder.collection_type);

        Ok(Self {
            folder,
            preferences: Arc::new(preferences),
            launcher,
            paging,
            scope: CancellationToken::new(),
            bridge: Arc::new(OnceLock::new()),
            adapter_initialized: Arc::new(AtomicBool::new(false)),
            page,
            poster_size: Property::new(prefs.poster_size, "poster_size"),
            image_type: Property::new(prefs.image_type, "image_type"),
            grid_direction: Property::new(prefs.grid_direction, "grid_direction"),
            favorite_only: Property::new(prefs.favorites_only, "favorite_only"),
            unwatched_only: Property::new(prefs.unwatched_only, "unwatched_only"),
            sort_option: Property::new(sort_option, "sort_option"),
            selected_index,
            reset_generation: Property::new(0, "reset_generation"),
            status_text,
        })
    }

    /// Build from a screen argument carrying the folder as JSON
    pub fn from_arguments(
        folder_json: Option<&str>,
        store: Arc<dyn PreferenceStore>,
        launcher: Arc<dyn ItemLauncher>,
        paging: PagingConfig,
    ) -> Result<Self, BrowseError> {
        let folder_json = folder_json.ok_or(BrowseError::MissingArgument("folder"))?;
        let folder = Folder::from_json(folder_json)?;
        Self::new(folder, store, launcher, paging)
    }

    fn status_property(
        selected_index: &Property<usize>,
        page: &PageState,
    ) -> ComputedProperty<Option<String>> {
        let selected = selected_index.clone();
        let total = page.total_items.clone();
        let dependencies: Vec<Arc<dyn PropertyLike>> = vec![
            Arc::new(selected_index.clone()),
            Arc::new(page.total_items.clone()),
        ];

        ComputedProperty::new("status_text", dependencies, move || {
            let total = total.get_sync();
            (total > 0).then(|| format!("{} of {}", selected.get_sync().min(total - 1) + 1, total))
        })
    }

    /// Wire a paged source to this screen and start the first retrieval.
    /// Only the first call per view model has any effect.
    pub async fn initialize_adapter(&self, source: Arc<dyn PagedItemSource>) -> bool {
        if self.adapter_initialized.swap(true, Ordering::SeqCst) {
            warn!("Adapter for {} already initialized, ignoring", self.folder.id);
            return false;
        }

        // Persisted filters and sort apply before the first page is requested
        let prefs = self.preferences.get();
        source.set_filters(prefs.filters()).await;
        source.set_sort(self.sort_option.get_sync()).await;

        let bridge =
            ItemSourceBridge::new(source, self.page.clone(), self.scope.child_token()).await;
        let bridge = self.bridge.get_or_init(|| bridge);
        bridge.retrieve().await;
        true
    }

    /// Build the chunked query for this folder over `backend` and initialize with it
    pub async fn initialize_with_backend(&self, backend: Arc<dyn LibraryBackend>) -> bool {
        let source = ChunkedItemSource::new(backend, self.folder.id.clone(), &self.paging);
        self.initialize_adapter(Arc::new(source)).await
    }

    fn bridge(&self) -> Option<&ItemSourceBridge> {
        self.bridge.get()
    }

    fn persist<F>(&self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut LibraryViewPreferences),
    {
        self.preferences
            .update(updater)
            .context("Failed to persist library preferences")
    }

    async fn apply_query(&self, filters: Option<FilterOptions>, sort: Option<SortOption>) {
        if let Some(bridge) = self.bridge() {
            if let Some(filters) = filters {
                bridge.set_filters(filters).await;
            }
            if let Some(sort) = sort {
                bridge.set_sort(sort).await;
            }
            bridge.retrieve().await;
        } else {
            debug!("No adapter yet, query change applies on initialization");
        }
        self.reset_to_top().await;
    }

    async fn reset_to_top(&self) {
        self.selected_index.set(0).await;
        self.reset_generation.update(|generation| *generation += 1).await;
    }

    pub async fn toggle_favorite_filter(&self) -> Result<()> {
        let favorite_only = !self.favorite_only.get_sync();
        self.persist(|p| p.favorites_only = favorite_only)?;

        let filters = FilterOptions {
            favorite_only,
            unwatched_only: self.unwatched_only.get_sync(),
        };
        debug!("Favorite filter -> {}", favorite_only);
        self.apply_query(Some(filters), None).await;
        self.favorite_only.set(favorite_only).await;
        Ok(())
    }

    pub async fn toggle_unwatched_only(&self) -> Result<()> {
        let unwatched_only = !self.unwatched_only.get_sync();
        self.persist(|p| p.unwatched_only = unwatched_only)?;

        let filters = FilterOptions {
            favorite_only: self.favorite_only.get_sync(),
            unwatched_only,
        };
        debug!("Unwatched filter -> {}", unwatched_only);
        self.apply_query(Some(filters), None).await;
        self.unwatched_only.set(unwatched_only).await;
        Ok(())
    }

    pub async fn set_sort_by(&self, option: SortOption) -> Result<()> {
        self.persist(|p| {
            p.sort_by = option.sort_by;
            p.sort_order = option.order;
        })?;

        debug!("Sort -> {:?} {:?}", option.sort_by, option.order);
        self.apply_query(None, Some(option.clone())).await;
        self.sort_option.set(option).await;
        Ok(())
    }

    /// Jump to items starting with `letter`; `None` clears the jump. Not persisted.
    pub async fn set_start_letter(&self, letter: Option<char>) {
        let letter = letter.map(|c| c.to_uppercase().collect::<String>());
        match self.bridge() {
            Some(bridge) => {
                bridge.set_start_letter(letter).await;
                bridge.retrieve().await;
            }
            None => debug!("No adapter yet, ignoring letter jump"),
        }
        self.reset_to_top().await;
    }

    pub async fn set_selected_index(&self, index: usize) {
        self.selected_index.set(index).await;
    }

    /// Forward the focused position so the next chunk loads near the end
    pub async fn load_more_if_needed(&self, position: usize) -> bool {
        match self.bridge() {
            Some(bridge) => bridge.load_more_items_if_needed(position).await,
            None => false,
        }
    }

    /// Fresh retrieval after a failure
    pub async fn retry(&self) {
        if let Some(bridge) = self.bridge() {
            bridge.retrieve().await;
        }
    }

    pub async fn re_retrieve_if_needed(&self) -> bool {
        match self.bridge() {
            Some(bridge) => bridge.re_retrieve_if_needed().await,
            None => false,
        }
    }

    pub async fn on_card_clicked(&self, item: &RowItem) -> Result<()> {
        let items = self.page.items.get_sync();
        let Some(position) = items.iter().position(|candidate| candidate.id == item.id) else {
            warn!("Ignoring click on {}, not in the loaded items", item.id);
            return Ok(());
        };
        let context = LaunchContext {
            folder_id: self.folder.id.clone(),
            position,
            total_items: self.page.total_items.get_sync(),
        };

        debug!("Launching {} at {}", item.id, position);
        self.launcher.launch(item, context).await
    }

    /// Show the display preferences screen, then pick up whatever it changed
    pub async fn open_display_preferences(
        &self,
        navigator: &dyn DisplayPreferencesNavigator,
    ) -> Result<bool> {
        navigator
            .open_display_preferences(
                &self.folder.preferences_key(),
                self.folder.collection_type.allows_view_selection(),
            )
            .await
            .map_err(|e| BrowseError::Navigation(format!("{:#}", e)))?;
        self.refresh_preferences().await
    }

    /// Re-read preference-backed state. Layout changes never retrieve; a
    /// filter or sort change made elsewhere is pushed and retrieved. Returns
    /// whether a retrieval was issued.
    pub async fn refresh_preferences(&self) -> Result<bool> {
        let prefs = self.preferences.reload()?;

        self.poster_size.set_if_changed(prefs.poster_size).await;
        self.image_type.set_if_changed(prefs.image_type).await;
        self.grid_direction.set_if_changed(prefs.grid_direction).await;

        let filters = prefs.filters();
        let current_filters = FilterOptions {
            favorite_only: self.favorite_only.get_sync(),
            unwatched_only: self.unwatched_only.get_sync(),
        };
        let current_sort = self.sort_option.get_sync();
        let filters_changed = filters != current_filters;
        let sort_changed =
            prefs.sort_by != current_sort.sort_by || prefs.sort_order != current_sort.order;

        if !filters_changed && !sort_changed {
            return Ok(false);
        }

        info!("Preferences for {} changed elsewhere, reloading", self.folder.id);
        let sort = SortOption::from_persisted(
            prefs.sort_by,
            prefs.sort_order,
            self.folder.collection_type,
        );
        self.apply_query(
            filters_changed.then_some(filters),
            sort_changed.then(|| sort.clone()),
        )
        .await;
        self.favorite_only.set(filters.favorite_only).await;
        self.unwatched_only.set(filters.unwatched_only).await;
        self.sort_option.set(sort).await;
        Ok(true)
    }

    pub fn sort_options(&self) -> Vec<SortOption> {
        sort_options_for(self.folder.collection_type)
    }

    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    pub fn paging(&self) -> &PagingConfig {
        &self.paging
    }

    pub fn filters(&self) -> FilterOptions {
        FilterOptions {
            favorite_only: self.favorite_only.get_sync(),
            unwatched_only: self.unwatched_only.get_sync(),
        }
    }

    pub fn items(&self) -> &Property<Vec<RowItem>> {
        &self.page.items
    }

    pub fn is_loading(&self) -> &Property<bool> {
        &self.page.is_loading
    }

    pub fn is_loading_more(&self) -> &Property<bool> {
        &self.page.is_loading_more
    }

    pub fn total_items(&self) -> &Property<usize> {
        &self.page.total_items
    }

    pub fn error(&self) -> &Property<Option<String>> {
        &self.page.error
    }

    pub fn start_letter(&self) -> &Property<Option<String>> {
        &self.page.start_letter
    }

    pub fn poster_size(&self) -> &Property<PosterSize> {
        &self.poster_size
    }

    pub fn image_type(&self) -> &Property<ImageType> {
        &self.image_type
    }

    pub fn grid_direction(&self) -> &Property<GridDirection> {
        &self.grid_direction
    }

    pub fn favorite_only(&self) -> &Property<bool> {
        &self.favorite_only
    }

    pub fn unwatched_only(&self) -> &Property<bool> {
        &self.unwatched_only
    }

    pub fn sort_option(&self) -> &Property<SortOption> {
        &self.sort_option
    }

    pub fn selected_index(&self) -> &Property<usize> {
        &self.selected_index
    }

    pub fn reset_generation(&self) -> &Property<u64> {
        &self.reset_generation
    }

    /// "N of M" for the status bar, `None` until items exist
    pub fn status_text(&self) -> &ComputedProperty<Option<String>> {
        &self.status_text
    }
}

#[async_trait::async_trait]
impl ViewModel for BrowseGridViewModel {
    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "items" => Some(self.page.items.subscribe()),
            "is_loading" => Some(self.page.is_loading.subscribe()),
            "is_loading_more" => Some(self.page.is_loading_more.subscribe()),
            "total_items" => Some(self.page.total_items.subscribe()),
            "error" => Some(self.page.error.subscribe()),
            "start_letter" => Some(self.page.start_letter.subscribe()),
            "poster_size" => Some(self.poster_size.subscribe()),
            "image_type" => Some(self.image_type.subscribe()),
            "grid_direction" => Some(self.grid_direction.subscribe()),
            "favorite_only" => Some(self.favorite_only.subscribe()),
            "unwatched_only" => Some(self.unwatched_only.subscribe()),
            "sort_option" => Some(self.sort_option.subscribe()),
            "selected_index" => Some(self.selected_index.subscribe()),
            "status_text" => Some(self.status_text.subscribe()),
            _ => None,
        }
    }

    async fn refresh(&self) {
        self.retry().await;
    }

    fn dispose(&self) {
        debug!("Disposing browse screen for {}", self.folder.id);
        if let Some(bridge) = self.bridge() {
            bridge.dispose();
        }
        self.scope.cancel();
    }
}
