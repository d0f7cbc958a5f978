use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DisplayPreferencesId, FolderId, RowItem};

/// Where an item launch originated, so the detail/playback screen can return
/// to the right place
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchContext {
    pub folder_id: FolderId,
    /// Position of the item within the loaded grid
    pub position: usize,
    pub total_items: usize,
}

/// Opens detail or playback views for a selected item
#[async_trait]
pub trait ItemLauncher: Send + Sync + std::fmt::Debug {
    async fn launch(&self, item: &RowItem, context: LaunchContext) -> Result<()>;
}

/// Opens the display preferences screen and resolves once the user leaves it
#[async_trait]
pub trait DisplayPreferencesNavigator: Send + Sync + std::fmt::Debug {
    async fn open_display_preferences(
        &self,
        preferences_id: &DisplayPreferencesId,
        allow_view_selection: bool,
    ) -> Result<()>;
}
