//! Runtime configuration for the API client and CLI.
//!
//! Values come from the environment:
//!
//! - `VESSEL_API_URL`: API base URL (default `http://localhost:8000/api`)
//! - `VESSEL_API_TOKEN`: bearer token, optional
//! - `VESSEL_UTC_OFFSET_HOURS`: display offset for timestamps (default `7`,
//!   `Asia/Ho_Chi_Minh`)
//!
//! Command-line flags override the environment.

use crate::error::{Error, Result};
use crate::timefmt::VIETNAM_UTC_OFFSET_SECS;

pub const ENV_API_URL: &str = "VESSEL_API_URL";
pub const ENV_API_TOKEN: &str = "VESSEL_API_TOKEN";
pub const ENV_UTC_OFFSET_HOURS: &str = "VESSEL_UTC_OFFSET_HOURS";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    /// Offset east of UTC, in seconds, for absolute timestamps.
    pub utc_offset_secs: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            utc_offset_secs: VIETNAM_UTC_OFFSET_SECS,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Config::default();

        if let Some(url) = non_empty(ENV_API_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!("{ENV_API_URL} must be an http(s) URL, got {url}")));
            }
            config.api_url = url;
        }

        config.api_token = non_empty(ENV_API_TOKEN);

        if let Some(raw) = non_empty(ENV_UTC_OFFSET_HOURS) {
            let hours: i32 = raw
                .parse()
                .map_err(|e| Error::Config(format!("{ENV_UTC_OFFSET_HOURS}={raw}: {e}")))?;
            if !(-12..=14).contains(&hours) {
                return Err(Error::Config(format!("{ENV_UTC_OFFSET_HOURS}={hours} is out of range")));
            }
            config.utc_offset_secs = hours * 3600;
        }

        log::debug!(
            "Configuration loaded api_url={} token_set={} utc_offset_secs={}",
            config.api_url,
            config.api_token.is_some(),
            config.utc_offset_secs
        );

        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, api_url: Option<String>, api_token: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(token) = api_token {
            self.api_token = Some(token);
        }
        self
    }
}
