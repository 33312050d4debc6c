//! # Client Configuration
//!
//! Settings come from built-in defaults, then environment variables, then
//! command line flags (applied by the binary).
//!
//! | Variable                      | Default                              |
//! |-------------------------------|--------------------------------------|
//! | `BUDGET_API_BASE_URL`         | `http://localhost:8000/api/`         |
//! | `BUDGET_API_TOKEN`            | none                                 |
//! | `BUDGET_DATA_DIR`             | `<platform data dir>/budget-tracker` |
//! | `BUDGET_FETCH_CONCURRENCY`    | `5`                                  |
//! | `BUDGET_REQUEST_TIMEOUT_SECS` | `30`                                 |

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::path::PathBuf;

use crate::domain::DEFAULT_MAX_CONCURRENT_YEAR_FETCHES;

pub const ENV_BASE_URL: &str = "BUDGET_API_BASE_URL";
pub const ENV_TOKEN: &str = "BUDGET_API_TOKEN";
pub const ENV_DATA_DIR: &str = "BUDGET_DATA_DIR";
pub const ENV_FETCH_CONCURRENCY: &str = "BUDGET_FETCH_CONCURRENCY";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "BUDGET_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound on concurrent year fetches
pub const MAX_CONCURRENT_YEAR_FETCHES: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root of the REST API; resource paths are joined onto it
    pub base_url: String,
    /// Pre-issued API token sent as `Authorization: Token <token>`
    pub token: Option<String>,
    /// Where local preferences (chart colors) are kept
    pub data_directory: PathBuf,
    pub max_concurrent_year_fetches: usize,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            data_directory: default_data_directory(),
            max_concurrent_year_fetches: DEFAULT_MAX_CONCURRENT_YEAR_FETCHES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// `<platform data dir>/budget-tracker`, or `./budget-tracker` when the
/// platform has no data directory
pub fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("budget-tracker")
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(token) = get(ENV_TOKEN) {
            config.token = Some(token);
        }
        if let Some(data_dir) = get(ENV_DATA_DIR) {
            config.data_directory = PathBuf::from(data_dir);
        }
        if let Some(concurrency) = get(ENV_FETCH_CONCURRENCY) {
            config.max_concurrent_year_fetches = concurrency
                .parse()
                .with_context(|| format!("{} must be a positive integer, got '{}'", ENV_FETCH_CONCURRENCY, concurrency))?;
        }
        if let Some(timeout) = get(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = timeout
                .parse()
                .with_context(|| format!("{} must be a positive integer, got '{}'", ENV_REQUEST_TIMEOUT_SECS, timeout))?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid API base URL '{}'", self.base_url))?;
        if self.max_concurrent_year_fetches == 0 {
            bail!("Year fetch concurrency must be at least 1");
        }
        if self.max_concurrent_year_fetches > MAX_CONCURRENT_YEAR_FETCHES {
            bail!(
                "Year fetch concurrency must be at most {}, got {}",
                MAX_CONCURRENT_YEAR_FETCHES,
                self.max_concurrent_year_fetches
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("Request timeout must be at least 1 second");
        }
        Ok(())
    }
}
