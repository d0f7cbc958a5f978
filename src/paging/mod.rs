pub mod bridge;
pub mod chunked_source;
pub mod source;

pub use bridge::{ItemSourceBridge, PageState};
pub use chunked_source::ChunkedItemSource;
pub use source::{ItemPage, ItemQuery, LibraryBackend, PagedItemSource, SourceChange};
