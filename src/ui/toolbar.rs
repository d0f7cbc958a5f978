use crate::models::{CollectionType, FilterOptions, ItemSortBy, SortOption, sort_options_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    Sort,
    Unwatched,
    Favorite,
    LetterJump,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarItem {
    pub button: ToolbarButton,
    pub label: &'static str,
    /// Highlighted when the matching filter is on
    pub active: bool,
}

/// User intents raised from the toolbar and its dialogs
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    OpenSortDialog,
    SelectSort(SortOption),
    DismissSortDialog,
    ToggleUnwatched,
    ToggleFavorite,
    JumpToLetter(Option<char>),
    OpenSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub items: Vec<ToolbarItem>,
}

impl Toolbar {
    pub fn build(filters: FilterOptions, collection_type: CollectionType) -> Self {
        let mut items = vec![ToolbarItem {
            button: ToolbarButton::Sort,
            label: "Sort by",
            active: false,
        }];

        if show_unwatched_filter(collection_type) {
            items.push(ToolbarItem {
                button: ToolbarButton::Unwatched,
                label: "Unwatched",
                active: filters.unwatched_only,
            });
        }

        items.push(ToolbarItem {
            button: ToolbarButton::Favorite,
            label: "Favorite",
            active: filters.favorite_only,
        });

        if show_letter_jump(collection_type) {
            items.push(ToolbarItem {
                button: ToolbarButton::LetterJump,
                label: "By letter",
                active: false,
            });
        }

        items.push(ToolbarItem {
            button: ToolbarButton::Settings,
            label: "Settings",
            active: false,
        });

        Self { items }
    }

    pub fn contains(&self, button: ToolbarButton) -> bool {
        self.items.iter().any(|item| item.button == button)
    }

    pub fn is_active(&self, button: ToolbarButton) -> bool {
        self.items
            .iter()
            .any(|item| item.button == button && item.active)
    }
}

/// Music has no watched state
fn show_unwatched_filter(collection_type: CollectionType) -> bool {
    !matches!(collection_type, CollectionType::Music)
}

/// Playlists keep their own order, so jumping by name makes no sense
fn show_letter_jump(collection_type: CollectionType) -> bool {
    !matches!(collection_type, CollectionType::Playlists)
}

/// Sort picker listing the options for a collection type
#[derive(Debug, Clone, PartialEq)]
pub struct SortDialog {
    pub options: Vec<SortOption>,
    pub selected: Option<usize>,
}

impl SortDialog {
    pub fn new(collection_type: CollectionType, current: ItemSortBy) -> Self {
        let options = sort_options_for(collection_type);
        let selected = options.iter().position(|o| o.sort_by == current);
        Self { options, selected }
    }

    pub fn option(&self, index: usize) -> Option<&SortOption> {
        self.options.get(index)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_reflects_filters() {
        let toolbar = Toolbar::build(
            FilterOptions {
                favorite_only: true,
                unwatched_only: false,
            },
            CollectionType::Movies,
        );
        let buttons: Vec<_> = toolbar.items.iter().map(|i| i.button).collect();
        assert_eq!(
            buttons,
            vec![
                ToolbarButton::Sort,
                ToolbarButton::Unwatched,
                ToolbarButton::Favorite,
                ToolbarButton::LetterJump,
                ToolbarButton::Settings,
            ]
        );
        assert!(toolbar.is_active(ToolbarButton::Favorite));
        assert!(!toolbar.is_active(ToolbarButton::Unwatched));
    }

    #[test]
    fn test_toolbar_hides_buttons_by_collection() {
        let music = Toolbar::build(FilterOptions::default(), CollectionType::Music);
        assert!(!music.contains(ToolbarButton::Unwatched));
        assert!(music.contains(ToolbarButton::LetterJump));

        let playlists = Toolbar::build(FilterOptions::default(), CollectionType::Playlists);
        assert!(!playlists.contains(ToolbarButton::LetterJump));
    }

    #[test]
    fn test_sort_dialog_marks_current() {
        let dialog = SortDialog::new(CollectionType::TvShows, ItemSortBy::SeriesDatePlayed);
        assert_eq!(dialog.selected, Some(6));
        assert_eq!(dialog.labels()[6], "Last Played");
        assert!(dialog.option(7).is_none());

        let dialog = SortDialog::new(CollectionType::TvShows, ItemSortBy::Runtime);
        assert_eq!(dialog.selected, None);
    }
}
