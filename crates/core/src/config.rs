use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Url;
use serde::Deserialize;

use crate::error::{DocreelError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_URL_ENV_VAR: &str = "DOCREEL_API_URL";

/// Where the service lives and how often it is polled.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    poll_interval_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docreel")
        .join("config.toml")
}

impl Config {
    /// Defaults, then the config file if present, then `DOCREEL_API_URL`.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        let path = get_config_path();
        if path.exists() {
            config = config.merge_file(&path)?;
        }

        if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
            config = config.with_api_url(&url)?;
        }

        Ok(config)
    }

    pub fn merge_file(self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| DocreelError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&raw, path)
    }

    fn merge_toml(mut self, raw: &str, path: &Path) -> Result<Self> {
        let file: FileConfig = toml::from_str(raw).map_err(|e| DocreelError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(url) = file.api_url {
            self = self.with_api_url(&url)?;
        }
        if let Some(ms) = file.poll_interval_ms {
            self.poll_interval = non_zero(Duration::from_millis(ms), "poll_interval_ms", path)?;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout =
                non_zero(Duration::from_secs(secs), "request_timeout_secs", path)?;
        }

        Ok(self)
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.api_url = parse_api_url(url)?;
        Ok(self)
    }

    /// Rejects a zero interval, which would spin the poll loop.
    pub fn with_poll_interval(mut self, interval: Duration) -> Result<Self> {
        self.poll_interval = non_zero(interval, "poll interval", Path::new("<override>"))?;
        Ok(self)
    }
}

fn non_zero(value: Duration, key: &str, path: &Path) -> Result<Duration> {
    if value.is_zero() {
        return Err(DocreelError::Config {
            path: path.to_path_buf(),
            reason: format!("{key} must be greater than zero"),
        });
    }
    Ok(value)
}

fn parse_api_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| DocreelError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(DocreelError::InvalidUrl {
            url: url.to_string(),
            reason: "expected an http(s) base URL".to_string(),
        });
    }

    Ok(parsed)
}
