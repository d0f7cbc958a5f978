use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
