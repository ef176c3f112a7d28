//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Variables
//!
//! ### Server
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `BASE_URL` - Public origin used in short links (default: `http://localhost:3000`)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` for client identity (default: `false`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! ### Cache
//!
//! - `CACHE_ENABLED` (default: `true`)
//! - `CACHE_TTL_SECONDS` (default: 3600)
//! - `CACHE_MAX_SIZE` (default: 1000)
//! - `CACHE_POPULAR_THRESHOLD` - Clicks before a URL is cached (default: 10)
//! - `CACHE_SWEEP_INTERVAL_SECONDS` - Expired entry sweep, `0` disables (default: 300)
//!
//! ### Rate limiting
//!
//! - `RATE_LIMIT_ENABLED` (default: `true`)
//! - `RATE_LIMIT_REQUESTS` - Bucket capacity per client (default: 10)
//! - `RATE_LIMIT_WINDOW_SECONDS` - Time to refill a full bucket (default: 60)
//! - `RATE_LIMIT_IDLE_WINDOWS` - Windows of inactivity before a bucket is dropped (default: 10)
//!
//! ### Codes
//!
//! - `SHORT_CODE_MIN_LENGTH` (default: 6)
//! - `CUSTOM_ALIAS_MIN_LENGTH` (default: 4)
//! - `CUSTOM_ALIAS_MAX_LENGTH` (default: 20)
//!
//! ### Background work
//!
//! - `CLICK_QUEUE_CAPACITY` - Click event buffer size (default: 10000, min: 100)

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::UrlServiceSettings;
use crate::infrastructure::rate_limit::RateLimitConfig;

const MAX_CACHE_TTL_SECONDS: u64 = 315_360_000;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub base_url: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,

    pub cache_enabled: bool,
    pub cache_ttl_seconds: u64,
    pub cache_max_size: usize,
    pub cache_popular_threshold: u64,
    pub cache_sweep_interval_seconds: u64,

    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_seconds: u64,
    pub rate_limit_idle_windows: u32,

    pub short_code_min_length: usize,
    pub custom_alias_min_length: usize,
    pub custom_alias_max_length: usize,

    pub click_queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            base_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            cache_enabled: true,
            cache_ttl_seconds: 3600,
            cache_max_size: 1000,
            cache_popular_threshold: 10,
            cache_sweep_interval_seconds: 300,
            rate_limit_enabled: true,
            rate_limit_requests: 10,
            rate_limit_window_seconds: 60,
            rate_limit_idle_windows: 10,
            short_code_min_length: 6,
            custom_alias_min_length: 4,
            custom_alias_max_length: 20,
            click_queue_capacity: 10_000,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            listen_addr: env::var("LISTEN").unwrap_or(defaults.listen_addr),
            base_url: env::var("BASE_URL").unwrap_or(defaults.base_url),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            behind_proxy: bool_var("BEHIND_PROXY", defaults.behind_proxy),

            cache_enabled: bool_var("CACHE_ENABLED", defaults.cache_enabled),
            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS", defaults.cache_ttl_seconds)?,
            cache_max_size: parse_var("CACHE_MAX_SIZE", defaults.cache_max_size)?,
            cache_popular_threshold: parse_var(
                "CACHE_POPULAR_THRESHOLD",
                defaults.cache_popular_threshold,
            )?,
            cache_sweep_interval_seconds: parse_var(
                "CACHE_SWEEP_INTERVAL_SECONDS",
                defaults.cache_sweep_interval_seconds,
            )?,

            rate_limit_enabled: bool_var("RATE_LIMIT_ENABLED", defaults.rate_limit_enabled),
            rate_limit_requests: parse_var("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?,
            rate_limit_window_seconds: parse_var(
                "RATE_LIMIT_WINDOW_SECONDS",
                defaults.rate_limit_window_seconds,
            )?,
            rate_limit_idle_windows: parse_var(
                "RATE_LIMIT_IDLE_WINDOWS",
                defaults.rate_limit_idle_windows,
            )?,

            short_code_min_length: parse_var(
                "SHORT_CODE_MIN_LENGTH",
                defaults.short_code_min_length,
            )?,
            custom_alias_min_length: parse_var(
                "CUSTOM_ALIAS_MIN_LENGTH",
                defaults.custom_alias_min_length,
            )?,
            custom_alias_max_length: parse_var(
                "CUSTOM_ALIAS_MAX_LENGTH",
                defaults.custom_alias_max_length,
            )?,

            click_queue_capacity: parse_var("CLICK_QUEUE_CAPACITY", defaults.click_queue_capacity)?,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.click_queue_capacity < 100 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY must be at least 100, got {}",
                self.click_queue_capacity
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        let base_url = url::Url::parse(&self.base_url)
            .with_context(|| format!("BASE_URL is not a valid URL: '{}'", self.base_url))?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        if self.cache_ttl_seconds == 0 || self.cache_ttl_seconds > MAX_CACHE_TTL_SECONDS {
            anyhow::bail!(
                "CACHE_TTL_SECONDS must be between 1 and {}, got {}",
                MAX_CACHE_TTL_SECONDS,
                self.cache_ttl_seconds
            );
        }

        if self.cache_max_size == 0 {
            anyhow::bail!("CACHE_MAX_SIZE must be at least 1");
        }

        if self.cache_popular_threshold == 0 {
            anyhow::bail!("CACHE_POPULAR_THRESHOLD must be at least 1");
        }

        if self.rate_limit_requests == 0 {
            anyhow::bail!("RATE_LIMIT_REQUESTS must be at least 1");
        }

        if self.rate_limit_window_seconds == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECONDS must be greater than 0");
        }

        if self.rate_limit_idle_windows == 0 {
            anyhow::bail!("RATE_LIMIT_IDLE_WINDOWS must be at least 1");
        }

        if self.short_code_min_length > 32 {
            anyhow::bail!(
                "SHORT_CODE_MIN_LENGTH must be at most 32, got {}",
                self.short_code_min_length
            );
        }

        if self.custom_alias_min_length == 0
            || self.custom_alias_min_length > self.custom_alias_max_length
        {
            anyhow::bail!(
                "CUSTOM_ALIAS_MIN_LENGTH must be between 1 and CUSTOM_ALIAS_MAX_LENGTH ({}), got {}",
                self.custom_alias_max_length,
                self.custom_alias_min_length
            );
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Interval of the background maintenance sweep, `None` when disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.cache_sweep_interval_seconds > 0)
            .then(|| Duration::from_secs(self.cache_sweep_interval_seconds))
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            enabled: self.rate_limit_enabled,
            capacity: self.rate_limit_requests,
            window: Duration::from_secs(self.rate_limit_window_seconds),
            idle_windows: self.rate_limit_idle_windows,
        }
    }

    pub fn service_settings(&self) -> UrlServiceSettings {
        UrlServiceSettings {
            popularity_threshold: self.cache_popular_threshold,
            alias_min_length: self.custom_alias_min_length,
            alias_max_length: self.custom_alias_max_length,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);

        if self.cache_enabled {
            tracing::info!(
                "  Cache: enabled (max_size={}, ttl={}s, popular_threshold={})",
                self.cache_max_size,
                self.cache_ttl_seconds,
                self.cache_popular_threshold
            );
        } else {
            tracing::info!("  Cache: disabled");
        }

        if self.rate_limit_enabled {
            tracing::info!(
                "  Rate limit: {} requests / {}s per client",
                self.rate_limit_requests,
                self.rate_limit_window_seconds
            );
        } else {
            tracing::info!("  Rate limit: disabled");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Click queue capacity: {}", self.click_queue_capacity);
    }
}

fn bool_var(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
