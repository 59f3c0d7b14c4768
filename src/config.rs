use std::time::Duration;

use url::Url;

use crate::errors::AppError;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("FORECAST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut api_base_url = Url::parse(&raw_url)
            .map_err(|e| AppError::Config(format!("FORECAST_API_URL '{}': {}", raw_url, e)))?;
        if !api_base_url.path().ends_with('/') {
            let path = format!("{}/", api_base_url.path());
            api_base_url.set_path(&path);
        }

        let debounce_ms = parse_u64(&lookup, "SEARCH_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let timeout_secs = parse_u64(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        let config = Self {
            api_base_url,
            search_debounce: Duration::from_millis(debounce_ms),
            request_timeout: Duration::from_secs(timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "FORECAST_API_URL must be http or https, got {}",
                self.api_base_url.scheme()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))),
        None => Ok(default),
    }
}
