//! Configuration management for tweetscout
//!
//! Settings come from an optional TOML file. The API credential itself is
//! only ever read from the environment and is never written back to disk.
//! A `.env` file can seed that environment before the config is loaded.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Environment variable name for the RapidAPI key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Value sent in the `x-rapidapi-host` header
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Base URL of the search API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the search endpoint, joined onto `base_url`
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Resolved credential (internal, never serialized)
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Path the config was loaded from (internal)
    #[serde(skip)]
    pub config_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_host: default_api_host(),
            base_url: default_base_url(),
            search_path: default_search_path(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            api_key: None,
            config_file: Self::default_config_path(),
        }
    }
}

impl Config {
    /// Get the default base directory for tweetscout (~/.tweetscout)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tweetscout")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Load configuration from a file, falling back to defaults when it does
    /// not exist. The credential is resolved from the environment afterwards.
    pub fn load(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str::<Config>(&content)?
        } else {
            debug!("No config file at {:?}, using defaults", config_path);
            Config::default()
        };
        config.config_file = config_path.to_path_buf();

        config.validate()?;
        config.resolve_api_key();
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_config_path())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.config_file, content)?;
        info!("Saved config to {:?}", self.config_file);
        Ok(())
    }

    /// Read the credential from the configured environment variable.
    /// An unset or empty variable leaves the key absent.
    pub fn resolve_api_key(&mut self) {
        self.api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());
    }

    /// Replace the credential explicitly
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Whether a credential is available
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full URL of the search endpoint
    pub fn search_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;
        base.join(&self.search_path)
            .map_err(|e| Error::Config(format!("Invalid search_path '{}': {}", self.search_path, e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key_env.trim().is_empty() {
            return Err(Error::Config("api_key_env must not be empty".to_string()));
        }

        if self.api_host.trim().is_empty() {
            return Err(Error::Config("api_host must not be empty".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }

        self.search_url()?;
        Ok(())
    }
}

/// Load a `.env` file from the working directory or its ancestors.
/// Variables already present in the environment are left untouched.
pub fn load_dotenv() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("Loaded environment from {:?}", path);
            true
        }
        Err(e) => report_dotenv_error(e),
    }
}

/// Load a specific env file, with the same precedence as [`load_dotenv`]
pub fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {:?}", path);
            true
        }
        Err(e) => report_dotenv_error(e),
    }
}

fn report_dotenv_error(e: dotenvy::Error) -> bool {
    if e.not_found() {
        debug!("No .env file found");
    } else {
        warn!("Ignoring .env file: {}", e);
    }
    false
}
