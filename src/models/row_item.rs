use serde::{Deserialize, Serialize};

use super::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Movie,
    Series,
    Season,
    Episode,
    Video,
    Audio,
    MusicAlbum,
    MusicArtist,
    Person,
    Photo,
    PhotoAlbum,
    Folder,
    CollectionFolder,
    UserView,
    Genre,
    Playlist,
    #[default]
    Other,
}

/// Display data for one grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    #[serde(default)]
    pub secondary_text: Option<String>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub played_percentage: Option<f32>,
    #[serde(default)]
    pub unplayed_item_count: Option<u32>,
    /// Episodes render with the series poster instead of a 16:9 still
    #[serde(default)]
    pub prefer_series_poster: bool,
}

impl RowItem {
    pub fn new(id: impl Into<ItemId>, kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            secondary_text: None,
            production_year: None,
            image_url: None,
            is_favorite: false,
            played: false,
            played_percentage: None,
            unplayed_item_count: None,
            prefer_series_poster: false,
        }
    }

    /// Partially watched: some progress recorded but not marked played
    pub fn is_in_progress(&self) -> bool {
        !self.played && self.played_percentage.is_some_and(|p| p > 0.0)
    }

    /// Subtitle shown under the card title, falling back to the year
    pub fn subtitle(&self) -> Option<String> {
        self.secondary_text
            .clone()
            .or_else(|| self.production_year.map(|y| y.to_string()))
    }
}
