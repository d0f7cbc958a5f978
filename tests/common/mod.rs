pub mod mocks;

use reel_browse::config::PagingConfig;
use reel_browse::models::{CollectionType, Folder};
use reel_browse::services::PreferenceStore;
use reel_browse::BrowseGridViewModel;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mocks::MockLauncher;

pub fn movies_folder() -> Folder {
    Folder::new("lib-movies", "Movies")
        .with_collection_type(CollectionType::Movies)
        .with_display_preferences_id("dp-lib-movies")
}

pub fn view_model(
    store: Arc<dyn PreferenceStore>,
    launcher: Arc<MockLauncher>,
) -> BrowseGridViewModel {
    BrowseGridViewModel::new(movies_folder(), store, launcher, PagingConfig::default())
        .expect("view model for a valid folder")
}

pub async fn wait_until<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(2) {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition().await
}

/// Wait until no first-page or next-page fetch is running
pub async fn wait_idle(vm: &BrowseGridViewModel) {
    let vm = vm.clone();
    assert!(
        wait_until(|| async { !vm.is_loading().get_sync() && !vm.is_loading_more().get_sync() })
            .await,
        "view model never went idle"
    );
}
