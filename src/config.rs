use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{IntoUrl, Url};

use crate::validate;

/// Environment variable holding the gateway API key
pub const API_KEY_ENV: &str = "EMBED_GATEWAY_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://embed-gateway.onrender.com/";

/// Requests that take longer than this fail instead of blocking the session
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl IntoUrl, api_key: String, timeout: Duration) -> Result<Self> {
        let mut base_url = base_url.into_url().context("Invalid gateway URL")?;
        // Url::join would otherwise replace the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        validate::api_key(&api_key)?;
        Ok(Self {
            base_url,
            api_key,
            timeout,
        })
    }

    /// Reads the API key from [`API_KEY_ENV`].
    ///
    /// Returns `Ok(None)` if the variable is unset; the gateway is optional.
    pub fn from_env(base_url: impl IntoUrl, timeout: Duration) -> Result<Option<Self>> {
        let Some(api_key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let config = Self::new(base_url, api_key, timeout)
            .with_context(|| format!("Invalid gateway configuration (from {API_KEY_ENV})"))?;
        Ok(Some(config))
    }
}
