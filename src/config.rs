//! Client configuration
//!
//! A [`ClientConfig`] can be loaded from YAML, read from the environment, or
//! assembled with [`ClientConfig::builder`].
//!
//! ```yaml
//! base_url: https://school.instructure.com
//! token: ${CANVAS_TOKEN}
//! per_page: 100
//! retry:
//!   max_attempts: 5
//!   base_delay_ms: 250
//! rate_limit:
//!   requests_per_second: 10
//!   burst_size: 20
//! ```
//!
//! `${VAR}` references in the YAML are replaced from the environment before
//! parsing.

use crate::error::{Error, Result, ResultExt};
use crate::http::{RateLimiterConfig, RetryPolicy};
use crate::types::BackoffType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the instance URL
pub const ENV_BASE_URL: &str = "CANVAS_BASE_URL";
/// Environment variable holding the access token
pub const ENV_TOKEN: &str = "CANVAS_TOKEN";
/// Environment variable holding the default page size
pub const ENV_PER_PAGE: &str = "CANVAS_PER_PAGE";

// ============================================================================
// Client Config
// ============================================================================

/// Everything needed to build a [`CanvasClient`](crate::CanvasClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Instance root, e.g. `https://school.instructure.com`
    pub base_url: String,

    /// Bearer access token
    pub token: String,

    /// Page size requested on the first page of every listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// `User-Agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Retry behavior
    #[serde(default)]
    pub retry: RetryConfig,

    /// Client-side throttling; absent means unthrottled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("canvas-client/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Config with defaults for everything but the instance and token
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            per_page: None,
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
            rate_limit: None,
        }
    }

    /// Start a builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse YAML, substituting `${VAR}` references from the environment
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let expanded = expand_env(yaml)?;
        let config: Self = serde_yaml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Read `CANVAS_BASE_URL`, `CANVAS_TOKEN` and optionally `CANVAS_PER_PAGE`
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_BASE_URL).map_err(|_| Error::missing_field(ENV_BASE_URL))?;
        let token = std::env::var(ENV_TOKEN).map_err(|_| Error::missing_field(ENV_TOKEN))?;

        let mut config = Self::new(base_url, token);
        if let Ok(per_page) = std::env::var(ENV_PER_PAGE) {
            let per_page = per_page
                .trim()
                .parse()
                .map_err(|e| Error::invalid_value(ENV_PER_PAGE, format!("{e}")))?;
            config.per_page = Some(per_page);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::missing_field("token"));
        }

        let url = self.parsed_base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(Error::invalid_value(
                "retry.max_attempts",
                "must be at least 1",
            ));
        }

        if self.per_page == Some(0) {
            return Err(Error::invalid_value("per_page", "must be at least 1"));
        }

        if let Some(ref limit) = self.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.requests_per_second",
                    "must be at least 1",
                ));
            }
        }

        Ok(())
    }

    /// Base URL as a parsed [`Url`]
    pub fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(self.base_url.trim())
            .map_err(|e| Error::invalid_value("base_url", format!("'{}': {e}", self.base_url)))
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("per_page", &self.per_page)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

// ============================================================================
// Retry Config
// ============================================================================

/// Serializable form of [`RetryPolicy`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Cap on any single delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Delay growth between retries
    #[serde(default)]
    pub backoff: BackoffType,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    60_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff: BackoffType::default(),
        }
    }
}

impl RetryConfig {
    /// Policy with the default classifier
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_backoff(self.backoff)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    token: Option<String>,
    per_page: Option<u32>,
    timeout_seconds: Option<u64>,
    user_agent: Option<String>,
    retry: Option<RetryConfig>,
    rate_limit: Option<RateLimiterConfig>,
}

impl ClientConfigBuilder {
    /// Set the instance URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the access token
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the page size for listings
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = Some(timeout.as_secs());
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the retry configuration
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Enable client-side throttling
    #[must_use]
    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.rate_limit = Some(RateLimiterConfig::new(requests_per_second, burst_size));
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self.base_url.ok_or_else(|| Error::missing_field("base_url"))?;
        let token = self.token.ok_or_else(|| Error::missing_field("token"))?;

        let mut config = ClientConfig::new(base_url, token);
        config.per_page = self.per_page;
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        if let Some(ua) = self.user_agent {
            config.user_agent = ua;
        }
        if let Some(retry) = self.retry {
            config.retry = retry;
        }
        config.rate_limit = self.rate_limit;

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Environment substitution
// ============================================================================

/// Regex for environment references: ${VAR_NAME}
static ENV_VAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}").unwrap());

/// Replace `${VAR}` with the value of environment variable `VAR`.
///
/// Every unset variable is reported in one error.
fn expand_env(input: &str) -> Result<String> {
    let mut missing = Vec::new();

    let expanded = ENV_VAR_REGEX.replace_all(input, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        std::env::var(name).unwrap_or_else(|_| {
            missing.push(name.to_string());
            String::new()
        })
    });

    if missing.is_empty() {
        Ok(expanded.into_owned())
    } else {
        Err(Error::config(format!(
            "environment variable(s) referenced in config are not set: {}",
            missing.join(", ")
        )))
    }
}
