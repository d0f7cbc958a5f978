pub mod errors;

pub use errors::BrowseError;
