use crate::common::mocks::{MockLauncher, MockPagedSource, catalog};
use crate::common::{view_model, wait_idle};
use reel_browse::models::{ItemSortBy, LibraryViewPreferences, PosterSize, SortOrder};
use reel_browse::services::{PreferenceStore, TomlPreferenceStore};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_choices_survive_next_screen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library_preferences.toml");

    {
        let store: Arc<dyn PreferenceStore> = Arc::new(TomlPreferenceStore::new(&path));
        let vm = view_model(store, Arc::new(MockLauncher::default()));
        vm.initialize_adapter(MockPagedSource::new(catalog(20), 10))
            .await;
        wait_idle(&vm).await;

        vm.toggle_unwatched_only().await.unwrap();
        let premiere = vm
            .sort_options()
            .into_iter()
            .find(|o| o.sort_by == ItemSortBy::PremiereDate)
            .unwrap();
        vm.set_sort_by(premiere).await.unwrap();
        wait_idle(&vm).await;
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("dp-lib-movies"));

    let store: Arc<dyn PreferenceStore> = Arc::new(TomlPreferenceStore::new(&path));
    let vm = view_model(store.clone(), Arc::new(MockLauncher::default()));
    assert!(vm.unwatched_only().get_sync());
    assert!(!vm.favorite_only().get_sync());
    assert_eq!(vm.sort_option().get_sync().sort_by, ItemSortBy::PremiereDate);
    assert_eq!(vm.sort_option().get_sync().order, SortOrder::Ascending);

    let source = MockPagedSource::new(catalog(20), 10);
    vm.initialize_adapter(source.clone()).await;
    wait_idle(&vm).await;
    assert!(source.retrievals()[0].unwatched_only);
    assert_eq!(vm.total_items().get_sync(), 10);
}

#[tokio::test]
async fn test_layout_edit_from_settings_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn PreferenceStore> =
        Arc::new(TomlPreferenceStore::new(dir.path().join("prefs.toml")));
    let vm = view_model(store.clone(), Arc::new(MockLauncher::default()));
    let source = MockPagedSource::new(catalog(20), 10);
    vm.initialize_adapter(source.clone()).await;
    wait_idle(&vm).await;

    let mut edited = LibraryViewPreferences::default();
    edited.poster_size = PosterSize::Large;
    store.store(&"dp-lib-movies".into(), &edited).unwrap();

    assert!(!vm.refresh_preferences().await.unwrap());
    assert_eq!(vm.poster_size().get_sync(), PosterSize::Large);
    assert_eq!(source.retrievals().len(), 1);
}
