use anyhow::Result;
use tracing::{debug, trace};

use super::card::ImageCard;
use super::grid_layout::GridLayout;
use super::toolbar::{SortDialog, Toolbar, ToolbarAction};
use crate::core::BrowseGridViewModel;
use crate::services::DisplayPreferencesNavigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    FirstCell,
}

/// Presentation glue for the browse grid: turns scroll and focus events into
/// view model calls and exposes what the grid should draw.
#[derive(Debug)]
pub struct BrowseGridView {
    view_model: BrowseGridViewModel,
    load_more_lines: usize,
    focused_generation: Option<u64>,
    sort_dialog: Option<SortDialog>,
}

impl BrowseGridView {
    pub fn new(view_model: BrowseGridViewModel) -> Self {
        let load_more_lines = view_model.paging().load_more_lines;
        Self {
            view_model,
            load_more_lines,
            focused_generation: None,
            sort_dialog: None,
        }
    }

    pub fn view_model(&self) -> &BrowseGridViewModel {
        &self.view_model
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::new(
            self.view_model.grid_direction().get_sync(),
            self.view_model.poster_size().get_sync(),
            self.view_model.image_type().get_sync(),
        )
    }

    /// Ask for the next chunk once the last visible cell is close to the end
    /// of what has loaded. Returns whether a load was requested.
    pub async fn on_scrolled(&self, last_visible: usize) -> bool {
        let loaded = self.view_model.items().get_sync().len();
        if !self.layout().is_near_end(last_visible, loaded, self.load_more_lines) {
            return false;
        }
        trace!("Scrolled near end: {} of {}", last_visible, loaded);
        self.view_model.load_more_if_needed(last_visible).await
    }

    /// Yields a focus request once per retrieval, as soon as it has items
    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        if self.view_model.is_loading().get_sync() || self.view_model.items().get_sync().is_empty()
        {
            return None;
        }

        let generation = self.view_model.reset_generation().get_sync();
        if self.focused_generation == Some(generation) {
            return None;
        }
        self.focused_generation = Some(generation);
        debug!("Focusing first cell for generation {}", generation);
        Some(FocusRequest::FirstCell)
    }

    pub async fn on_cell_focused(&self, index: usize) -> bool {
        self.view_model.set_selected_index(index).await;
        self.on_scrolled(index).await
    }

    pub async fn on_cell_clicked(&self, index: usize) -> Result<bool> {
        let item = self.view_model.items().get_sync().get(index).cloned();
        match item {
            Some(item) => {
                self.view_model.on_card_clicked(&item).await?;
                Ok(true)
            }
            None => {
                debug!("Click on unloaded cell {}", index);
                Ok(false)
            }
        }
    }

    pub fn status_text(&self) -> Option<String> {
        self.view_model.status_text().get_sync()
    }

    pub fn toolbar(&self) -> Toolbar {
        Toolbar::build(
            self.view_model.filters(),
            self.view_model.folder().collection_type,
        )
    }

    pub fn sort_dialog(&self) -> Option<&SortDialog> {
        self.sort_dialog.as_ref()
    }

    pub fn cards(&self) -> Vec<ImageCard> {
        let image_type = self.view_model.image_type().get_sync();
        self.view_model
            .items()
            .get_sync()
            .iter()
            .map(|item| ImageCard::from_item(item, image_type))
            .collect()
    }

    /// Message to show in place of the grid after a failed load
    pub fn error_banner(&self) -> Option<String> {
        self.view_model.error().get_sync()
    }

    pub async fn retry(&self) {
        self.view_model.retry().await;
    }

    pub async fn dispatch(
        &mut self,
        action: ToolbarAction,
        navigator: &dyn DisplayPreferencesNavigator,
    ) -> Result<()> {
        debug!("Toolbar action: {:?}", action);
        match action {
            ToolbarAction::OpenSortDialog => {
                self.sort_dialog = Some(SortDialog::new(
                    self.view_model.folder().collection_type,
                    self.view_model.sort_option().get_sync().sort_by,
                ));
            }
            ToolbarAction::SelectSort(option) => {
                self.sort_dialog = None;
                self.view_model.set_sort_by(option).await?;
            }
            ToolbarAction::DismissSortDialog => self.sort_dialog = None,
            ToolbarAction::ToggleUnwatched => self.view_model.toggle_unwatched_only().await?,
            ToolbarAction::ToggleFavorite => self.view_model.toggle_favorite_filter().await?,
            ToolbarAction::JumpToLetter(letter) => self.view_model.set_start_letter(letter).await,
            ToolbarAction::OpenSettings => {
                self.view_model.open_display_preferences(navigator).await?;
            }
        }
        Ok(())
    }
}
