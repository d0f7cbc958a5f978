use serde::{Deserialize, Serialize};

use super::filters::{FilterOptions, ItemSortBy, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PosterSize {
    Smallest,
    Small,
    #[default]
    Med,
    Large,
    XLarge,
}

impl PosterSize {
    pub const ALL: [PosterSize; 5] = [
        PosterSize::Smallest,
        PosterSize::Small,
        PosterSize::Med,
        PosterSize::Large,
        PosterSize::XLarge,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    #[default]
    Poster,
    Thumb,
    Banner,
}

impl ImageType {
    pub const ALL: [ImageType; 3] = [ImageType::Poster, ImageType::Thumb, ImageType::Banner];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GridDirection {
    #[default]
    Vertical,
    Horizontal,
}

/// Per-folder view settings persisted by the preference store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryViewPreferences {
    #[serde(default)]
    pub poster_size: PosterSize,
    #[serde(default)]
    pub image_type: ImageType,
    #[serde(default)]
    pub grid_direction: GridDirection,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default)]
    pub unwatched_only: bool,
    #[serde(default)]
    pub sort_by: ItemSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for LibraryViewPreferences {
    fn default() -> Self {
        Self {
            poster_size: PosterSize::default(),
            image_type: ImageType::default(),
            grid_direction: GridDirection::default(),
            favorites_only: false,
            unwatched_only: false,
            sort_by: ItemSortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl LibraryViewPreferences {
    pub fn filters(&self) -> FilterOptions {
        FilterOptions {
            favorite_only: self.favorites_only,
            unwatched_only: self.unwatched_only,
        }
    }
}
