// Browse grid state and paging for a library screen, independent of any
// particular toolkit. The view layer drives `ui::BrowseGridView`.

pub mod config;
pub mod constants;
pub mod core;
pub mod logging;
pub mod models;
pub mod paging;
pub mod services;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use core::{BrowseGridViewModel, ViewModel};
pub use utils::BrowseError;
