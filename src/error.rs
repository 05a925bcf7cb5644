use thiserror::Error;

/// Custom error type for the hostwatch agent
#[derive(Error, Debug)]
pub enum HostwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the hostwatch agent
pub type Result<T> = std::result::Result<T, HostwatchError>;

impl HostwatchError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        HostwatchError::Config(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        HostwatchError::MetricCollection(msg.into())
    }

    pub fn notification<S: Into<String>>(msg: S) -> Self {
        HostwatchError::Notification(msg.into())
    }
}
