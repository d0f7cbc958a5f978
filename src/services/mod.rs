pub mod navigation;
pub mod preferences;

pub use navigation::{DisplayPreferencesNavigator, ItemLauncher, LaunchContext};
pub use preferences::{
    LibraryPreferences, MemoryPreferenceStore, PreferenceStore, TomlPreferenceStore,
};
