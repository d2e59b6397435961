use crate::errors::UiError;
use std::{env, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://acnhapi.com/v1a";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Application backend serving `/api/...`.
    pub api_base_url: String,
    /// Third-party species reference API.
    pub catalog_base_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn new(api_base_url: impl Into<String>, catalog_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_base(api_base_url.into()),
            catalog_base_url: trim_base(catalog_base_url.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, UiError> {
        let api_base_url =
            env::var("FISH_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let catalog_base_url = env::var("FISH_CATALOG_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_BASE_URL.to_string());

        let timeout = match env::var("FISH_HTTP_TIMEOUT_SECS") {
            Ok(value) => parse_timeout(&value)?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            timeout,
            ..Self::new(api_base_url, catalog_base_url)
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_timeout(value: &str) -> Result<Duration, UiError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(UiError::InvalidConfig {
            key: "FISH_HTTP_TIMEOUT_SECS",
            value: value.to_string(),
        }),
    }
}
