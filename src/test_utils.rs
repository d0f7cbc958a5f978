#![cfg(test)]

/// Common test utilities
pub mod common {
    use std::future::Future;
    use std::time::Duration;
    use tokio::time::sleep;

    /// Wait for an async condition to become true
    pub async fn wait_for_async<F, Fut>(mut condition: F, max_wait: Duration) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let start = std::time::Instant::now();

        while start.elapsed() < max_wait {
            if condition().await {
                return true;
            }
            sleep(Duration::from_millis(5)).await;
        }

        condition().await
    }
}

/// Recording collaborators for view model tests
pub mod fakes {
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::models::{DisplayPreferencesId, RowItem};
    use crate::services::{DisplayPreferencesNavigator, ItemLauncher, LaunchContext};

    #[derive(Debug, Default)]
    pub struct RecordingLauncher {
        pub launched: Mutex<Vec<(RowItem, LaunchContext)>>,
    }

    #[async_trait]
    impl ItemLauncher for RecordingLauncher {
        async fn launch(&self, item: &RowItem, context: LaunchContext) -> Result<()> {
            self.launched.lock().unwrap().push((item.clone(), context));
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        pub opened: Mutex<Vec<(DisplayPreferencesId, bool)>>,
    }

    #[async_trait]
    impl DisplayPreferencesNavigator for RecordingNavigator {
        async fn open_display_preferences(
            &self,
            preferences_id: &DisplayPreferencesId,
            allow_view_selection: bool,
        ) -> Result<()> {
            self.opened
                .lock()
                .unwrap()
                .push((preferences_id.clone(), allow_view_selection));
            Ok(())
        }
    }
}
