pub mod filters;
pub mod folder;
mod identifiers;
pub mod preferences;
pub mod row_item;

pub use filters::{FilterOptions, ItemSortBy, SortOption, SortOrder, sort_options_for};
pub use folder::{CollectionType, Folder};
pub use identifiers::{DisplayPreferencesId, FolderId, ItemId};
pub use preferences::{GridDirection, ImageType, LibraryViewPreferences, PosterSize};
pub use row_item::{ItemKind, RowItem};
