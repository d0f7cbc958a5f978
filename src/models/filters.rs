use serde::{Deserialize, Serialize};

use super::CollectionType;

/// Item filters pushed to the paged source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub favorite_only: bool,
    pub unwatched_only: bool,
}

impl FilterOptions {
    pub fn is_active(&self) -> bool {
        self.favorite_only || self.unwatched_only
    }
}

/// Server-side sort field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemSortBy {
    #[default]
    SortName,
    DateCreated,
    PremiereDate,
    OfficialRating,
    CommunityRating,
    CriticRating,
    DatePlayed,
    SeriesDatePlayed,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    pub label: String,
    pub sort_by: ItemSortBy,
    pub order: SortOrder,
}

impl SortOption {
    pub fn new(label: impl Into<String>, sort_by: ItemSortBy, order: SortOrder) -> Self {
        Self {
            label: label.into(),
            sort_by,
            order,
        }
    }

    /// Option matching a persisted field, labelled from the known menu when possible
    pub fn from_persisted(
        sort_by: ItemSortBy,
        order: SortOrder,
        collection_type: CollectionType,
    ) -> Self {
        let label = sort_options_for(collection_type)
            .into_iter()
            .find(|option| option.sort_by == sort_by)
            .map(|option| option.label)
            .unwrap_or_default();
        Self::new(label, sort_by, order)
    }
}

impl Default for SortOption {
    fn default() -> Self {
        Self::new("Name", ItemSortBy::SortName, SortOrder::Ascending)
    }
}

/// Sort menu for a collection type. TV shows sort "last played" by series,
/// movies additionally get runtime.
pub fn sort_options_for(collection_type: CollectionType) -> Vec<SortOption> {
    let mut options = vec![
        SortOption::new("Name", ItemSortBy::SortName, SortOrder::Ascending),
        SortOption::new("Date Added", ItemSortBy::DateCreated, SortOrder::Descending),
        SortOption::new("Premiere Date", ItemSortBy::PremiereDate, SortOrder::Descending),
        SortOption::new("Parental Rating", ItemSortBy::OfficialRating, SortOrder::Ascending),
        SortOption::new("Community Rating", ItemSortBy::CommunityRating, SortOrder::Descending),
        SortOption::new("Critic Rating", ItemSortBy::CriticRating, SortOrder::Descending),
    ];

    if collection_type == CollectionType::TvShows {
        options.push(SortOption::new(
            "Last Played",
            ItemSortBy::SeriesDatePlayed,
            SortOrder::Descending,
        ));
    } else {
        options.push(SortOption::new(
            "Last Played",
            ItemSortBy::DatePlayed,
            SortOrder::Descending,
        ));
    }

    if collection_type == CollectionType::Movies {
        options.push(SortOption::new("Runtime", ItemSortBy::Runtime, SortOrder::Ascending));
    }

    options
}
