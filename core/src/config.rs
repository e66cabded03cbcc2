//! Client configuration
//!
//! Values come from the environment, with defaults for local development:
//! - `FINANCE_API_URL`: base URL of the API (default `http://localhost:3000`)
//! - `FINANCE_TOKEN_PATH`: file holding the session token (default
//!   `<data dir>/finance-tracker/session.json`)

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const API_URL_ENV: &str = "FINANCE_API_URL";
pub const TOKEN_PATH_ENV: &str = "FINANCE_TOKEN_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token_path: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            token_path: token_path.into(),
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token_path = lookup(TOKEN_PATH_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_token_path);
        Self {
            base_url,
            token_path,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, default_token_path())
    }
}

/// Platform data directory, or a dot-directory under the working directory
/// when the platform has none.
pub fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("finance-tracker"))
        .unwrap_or_else(|| PathBuf::from(".finance-tracker"))
        .join("session.json")
}
