pub mod browse_grid;
pub mod card;
pub mod grid_layout;
pub mod toolbar;

pub use browse_grid::{BrowseGridView, FocusRequest};
pub use card::{CardBadge, CardIcon, ImageCard};
pub use grid_layout::GridLayout;
pub use toolbar::{SortDialog, Toolbar, ToolbarAction, ToolbarButton, ToolbarItem};
