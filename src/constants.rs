// Paging and layout tuning for the browse grid.
// Adjust these to balance network round trips against scroll responsiveness.

// === Paging ===
/// Items requested per page from the server
pub const DEFAULT_CHUNK_SIZE: usize = 100;
/// Fetch the next page once the focused position is this close to the loaded end
pub const DEFAULT_FETCH_DISTANCE: usize = 20;

// === Grid ===
/// Rows (vertical) or columns (horizontal) from the end that trigger a load-more
pub const LOAD_MORE_LINES: usize = 2;

// === Preferences ===
/// Preference key used when a folder has no display preferences id
pub const DEFAULT_DISPLAY_PREFERENCES_ID: &str = "empty_preferences";
