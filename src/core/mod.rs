pub mod viewmodels;

pub use viewmodels::{BrowseGridViewModel, ViewModel};
