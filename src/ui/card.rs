use crate::models::{ImageType, ItemKind, RowItem};

pub const ASPECT_RATIO_2_3: f32 = 2.0 / 3.0;
pub const ASPECT_RATIO_16_9: f32 = 16.0 / 9.0;
pub const ASPECT_RATIO_BANNER: f32 = 1000.0 / 185.0;
pub const ASPECT_RATIO_SQUARE: f32 = 1.0;

/// Placeholder artwork shown while the image loads or when there is none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIcon {
    Album,
    User,
    Tv,
    Folder,
    Photo,
    Clapperboard,
}

/// Overlay in the card corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardBadge {
    Watched,
    UnplayedCount(u32),
    Progress(f32),
}

/// Everything needed to draw one grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCard {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub aspect_ratio: f32,
    pub placeholder: CardIcon,
    pub badge: Option<CardBadge>,
    pub is_favorite: bool,
}

impl ImageCard {
    pub fn from_item(item: &RowItem, image_type: ImageType) -> Self {
        Self {
            title: item.name.clone(),
            subtitle: item.subtitle(),
            image_url: item.image_url.clone(),
            aspect_ratio: aspect_ratio(item, image_type),
            placeholder: placeholder_icon(item.kind),
            badge: badge(item),
            is_favorite: item.is_favorite,
        }
    }
}

pub fn aspect_ratio(item: &RowItem, image_type: ImageType) -> f32 {
    let by_image_type = match image_type {
        ImageType::Banner => ASPECT_RATIO_BANNER,
        ImageType::Thumb => ASPECT_RATIO_16_9,
        ImageType::Poster => ASPECT_RATIO_2_3,
    };

    match item.kind {
        ItemKind::Audio | ItemKind::MusicAlbum | ItemKind::MusicArtist => ASPECT_RATIO_SQUARE,
        ItemKind::Episode if item.prefer_series_poster => ASPECT_RATIO_2_3,
        ItemKind::Episode => ASPECT_RATIO_16_9,
        ItemKind::CollectionFolder | ItemKind::UserView => ASPECT_RATIO_16_9,
        _ => by_image_type,
    }
}

pub fn placeholder_icon(kind: ItemKind) -> CardIcon {
    match kind {
        ItemKind::Audio | ItemKind::MusicAlbum => CardIcon::Album,
        ItemKind::Person | ItemKind::MusicArtist => CardIcon::User,
        ItemKind::Season | ItemKind::Series | ItemKind::Episode => CardIcon::Tv,
        ItemKind::Photo => CardIcon::Photo,
        ItemKind::Movie | ItemKind::Video => CardIcon::Clapperboard,
        ItemKind::CollectionFolder
        | ItemKind::UserView
        | ItemKind::Folder
        | ItemKind::Genre
        | ItemKind::PhotoAlbum
        | ItemKind::Playlist
        | ItemKind::Other => CardIcon::Folder,
    }
}

fn badge(item: &RowItem) -> Option<CardBadge> {
    if item.played {
        return Some(CardBadge::Watched);
    }
    if let Some(count) = item.unplayed_item_count.filter(|c| *c > 0) {
        return Some(CardBadge::UnplayedCount(count));
    }
    item.played_percentage
        .filter(|_| item.is_in_progress())
        .map(|p| CardBadge::Progress(p.clamp(0.0, 100.0)))
}
