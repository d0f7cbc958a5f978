use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{DisplayPreferencesId, LibraryViewPreferences};

/// Backing storage for per-folder view preferences
pub trait PreferenceStore: Send + Sync + Debug {
    fn load(&self, key: &DisplayPreferencesId) -> Result<Option<LibraryViewPreferences>>;

    fn store(&self, key: &DisplayPreferencesId, prefs: &LibraryViewPreferences) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    libraries: BTreeMap<String, LibraryViewPreferences>,
}

/// All folders' preferences in one TOML file, keyed by display preferences id
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TomlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at the configured location
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.preferences_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<PreferencesFile> {
        if !self.path.exists() {
            return Ok(PreferencesFile::default());
        }
        let contents =
            fs::read_to_string(&self.path).context("Failed to read library preferences")?;
        toml::from_str(&contents).context("Failed to parse library preferences")
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn load(&self, key: &DisplayPreferencesId) -> Result<Option<LibraryViewPreferences>> {
        Ok(self.read_file()?.libraries.remove(key.as_str()))
    }

    fn store(&self, key: &DisplayPreferencesId, prefs: &LibraryViewPreferences) -> Result<()> {
        let _guard = lock(&self.write_lock);

        let mut file = self.read_file()?;
        file.libraries.insert(key.to_string(), prefs.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }
        let contents =
            toml::to_string_pretty(&file).context("Failed to serialize library preferences")?;
        fs::write(&self.path, contents).context("Failed to write library preferences")?;

        debug!("Library preferences for {} saved to {:?}", key, self.path);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, LibraryViewPreferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &DisplayPreferencesId) -> Result<Option<LibraryViewPreferences>> {
        Ok(lock(&self.entries).get(key.as_str()).cloned())
    }

    fn store(&self, key: &DisplayPreferencesId, prefs: &LibraryViewPreferences) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), prefs.clone());
        Ok(())
    }
}

/// One folder's preferences: read with `get`, stage with `set`, persist with `commit`.
#[derive(Debug)]
pub struct LibraryPreferences {
    key: DisplayPreferencesId,
    store: Arc<dyn PreferenceStore>,
    current: Mutex<LibraryViewPreferences>,
}

impl LibraryPreferences {
    pub fn open(store: Arc<dyn PreferenceStore>, key: DisplayPreferencesId) -> Result<Self> {
        let current = match store.load(&key)? {
            Some(prefs) => prefs,
            None => {
                info!("No saved preferences for {}, using defaults", key);
                LibraryViewPreferences::default()
            }
        };

        Ok(Self {
            key,
            store,
            current: Mutex::new(current),
        })
    }

    pub fn key(&self) -> &DisplayPreferencesId {
        &self.key
    }

    pub fn get(&self) -> LibraryViewPreferences {
        lock(&self.current).clone()
    }

    pub fn set<F>(&self, updater: F)
    where
        F: FnOnce(&mut LibraryViewPreferences),
    {
        updater(&mut lock(&self.current));
    }

    pub fn commit(&self) -> Result<()> {
        let snapshot = self.get();
        self.store
            .store(&self.key, &snapshot)
            .with_context(|| format!("Failed to commit preferences for {}", self.key))
    }

    /// Apply `updater` and persist in one step. The cached value only changes
    /// once the store accepted the write.
    pub fn update<F>(&self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut LibraryViewPreferences),
    {
        let mut staged = self.get();
        updater(&mut staged);
        self.store
            .store(&self.key, &staged)
            .with_context(|| format!("Failed to commit preferences for {}", self.key))?;
        *lock(&self.current) = staged;
        Ok(())
    }

    /// Re-read from the store, picking up changes written by another screen
    pub fn reload(&self) -> Result<LibraryViewPreferences> {
        let fresh = self.store.load(&self.key)?.unwrap_or_default();
        *lock(&self.current) = fresh.clone();
        Ok(fresh)
    }
}
