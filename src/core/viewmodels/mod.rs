pub mod browse_grid_view_model;
pub mod property;

pub use browse_grid_view_model::BrowseGridViewModel;
pub use property::{ComputedProperty, Property, PropertySubscriber};

#[async_trait::async_trait]
pub trait ViewModel: Send + Sync {
    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber>;

    async fn refresh(&self);

    fn dispose(&self);
}
