//! Custom error types for tweetscout

use thiserror::Error;

/// Main error type for tweetscout operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote API error: {0}")]
    Remote(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("MCP protocol error: {0}")]
    McpProtocol(String),
}

impl Error {
    /// True for failures that came from talking to the search API
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_) | Error::Http(_))
    }
}

/// Result type alias for tweetscout
pub type Result<T> = std::result::Result<T, Error>;
