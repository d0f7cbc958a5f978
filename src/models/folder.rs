use serde::{Deserialize, Serialize};

use super::{DisplayPreferencesId, FolderId};
use crate::constants::DEFAULT_DISPLAY_PREFERENCES_ID;

/// Kind of content a library folder holds. Drives which sort options are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Movies,
    TvShows,
    Music,
    BoxSets,
    HomeVideos,
    Playlists,
    LiveTv,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CollectionType {
    /// Whether the display preferences screen may switch views for this collection
    pub fn allows_view_selection(self) -> bool {
        matches!(
            self,
            CollectionType::Movies | CollectionType::TvShows | CollectionType::Music
        )
    }
}

/// The library container being browsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub display_preferences_id: Option<DisplayPreferencesId>,
    #[serde(default)]
    pub collection_type: CollectionType,
}

impl Folder {
    pub fn new(id: impl Into<FolderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_preferences_id: None,
            collection_type: CollectionType::Unknown,
        }
    }

    pub fn with_collection_type(mut self, collection_type: CollectionType) -> Self {
        self.collection_type = collection_type;
        self
    }

    pub fn with_display_preferences_id(mut self, id: impl Into<DisplayPreferencesId>) -> Self {
        self.display_preferences_id = Some(id.into());
        self
    }

    /// Key used for per-folder view preferences
    pub fn preferences_key(&self) -> DisplayPreferencesId {
        self.display_preferences_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DisplayPreferencesId::new(DEFAULT_DISPLAY_PREFERENCES_ID))
    }

    /// Decode a folder passed to the screen as JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
