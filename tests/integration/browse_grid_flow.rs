use crate::common::mocks::{MockBackend, MockLauncher, MockPagedSource, catalog};
use crate::common::{view_model, wait_idle, wait_until};
use reel_browse::models::FilterOptions;
use reel_browse::services::{MemoryPreferenceStore, PreferenceStore};
use reel_browse::ui::{BrowseGridView, FocusRequest};
use reel_browse::ViewModel;
use std::sync::Arc;

fn store() -> Arc<dyn PreferenceStore> {
    Arc::new(MemoryPreferenceStore::new())
}

#[tokio::test]
async fn test_favorite_toggle_twice_restores_query() {
    let vm = view_model(store(), Arc::new(MockLauncher::default()));
    let source = MockPagedSource::new(catalog(30), 10);
    vm.initialize_adapter(source.clone()).await;
    wait_idle(&vm).await;
    assert_eq!(vm.total_items().get_sync(), 30);

    vm.toggle_favorite_filter().await.unwrap();
    wait_idle(&vm).await;
    assert!(vm.favorite_only().get_sync());
    assert_eq!(vm.total_items().get_sync(), 10);

    vm.toggle_favorite_filter().await.unwrap();
    wait_idle(&vm).await;
    assert!(!vm.favorite_only().get_sync());
    assert_eq!(vm.total_items().get_sync(), 30);

    let favorites = FilterOptions {
        favorite_only: true,
        unwatched_only: false,
    };
    assert_eq!(
        source.retrievals(),
        vec![FilterOptions::default(), favorites, FilterOptions::default()]
    );
    vm.dispose();
}

#[tokio::test]
async fn test_both_filters_combine() {
    let vm = view_model(store(), Arc::new(MockLauncher::default()));
    let source = MockPagedSource::new(catalog(30), 10);
    vm.initialize_adapter(source.clone()).await;
    wait_idle(&vm).await;

    vm.toggle_unwatched_only().await.unwrap();
    wait_idle(&vm).await;
    vm.toggle_favorite_filter().await.unwrap();
    wait_idle(&vm).await;

    // Favorite and unwatched: multiples of 6 below 30
    assert_eq!(vm.total_items().get_sync(), 5);
    assert_eq!(
        source.retrievals().last().copied(),
        Some(FilterOptions {
            favorite_only: true,
            unwatched_only: true,
        })
    );
}

#[tokio::test]
async fn test_scrolling_pages_through_library() {
    let vm = view_model(store(), Arc::new(MockLauncher::default()));
    let backend = MockBackend::new(230);
    vm.initialize_with_backend(backend.clone()).await;
    wait_idle(&vm).await;

    let mut view = BrowseGridView::new(vm.clone());
    assert_eq!(view.take_focus_request(), Some(FocusRequest::FirstCell));
    assert_eq!(vm.items().get_sync().len(), 100);

    for target in [200, 230] {
        let loaded = vm.items().get_sync().len();
        assert!(view.on_scrolled(loaded - 1).await);
        assert!(wait_until(|| async { vm.items().get_sync().len() == target }).await);
        wait_idle(&vm).await;
    }

    // Everything is loaded; nothing further is requested from the server
    view.on_scrolled(229).await;
    wait_idle(&vm).await;
    let starts: Vec<usize> = backend
        .queries
        .lock()
        .unwrap()
        .iter()
        .map(|q| q.start_index)
        .collect();
    assert_eq!(starts, vec![0, 100, 200]);
    assert_eq!(view.take_focus_request(), None);
}

#[tokio::test]
async fn test_failed_retrieval_can_be_retried() {
    let vm = view_model(store(), Arc::new(MockLauncher::default()));
    let source = MockPagedSource::new(catalog(12), 10);
    source.inject_error("connection refused");
    vm.initialize_adapter(source.clone()).await;
    wait_idle(&vm).await;

    let view = BrowseGridView::new(vm.clone());
    assert_eq!(view.error_banner().as_deref(), Some("connection refused"));
    assert!(view.cards().is_empty());

    source.clear_error();
    view.retry().await;
    wait_idle(&vm).await;
    assert_eq!(view.error_banner(), None);
    assert_eq!(view.cards().len(), 10);
    assert_eq!(vm.total_items().get_sync(), 12);
}

#[tokio::test]
async fn test_card_click_reports_position() {
    let launcher = Arc::new(MockLauncher::default());
    let vm = view_model(store(), launcher.clone());
    vm.initialize_adapter(MockPagedSource::new(catalog(12), 10))
        .await;
    wait_idle(&vm).await;

    let view = BrowseGridView::new(vm);
    assert!(view.on_cell_clicked(4).await.unwrap());

    let launched = launcher.launched.lock().unwrap();
    assert_eq!(launched[0].0, "m4");
    assert_eq!(launched[0].1.position, 4);
    assert_eq!(launched[0].1.total_items, 12);
}
