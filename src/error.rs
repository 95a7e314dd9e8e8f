//! Error types for the Coinwatch application.

use thiserror::Error;

/// The main error type for Coinwatch.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (cache files, config, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote API errors
    #[error("API error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limiting errors
    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u64),

    /// Generic application error
    #[error("{0}")]
    Application(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new auth error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new application error.
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application(msg.into())
    }

    /// Check if this error is recoverable (a later attempt can succeed).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited(_) | Self::Channel(_) | Self::Http(_)
        )
    }
}
