use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use fetchfox_client::{FetchFoxClient, PollConfig, DEFAULT_HOST, DEFAULT_MAX_PAGES};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Tool configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub host: String,
    pub http_timeout: Duration,
    pub max_pages: u32,
    pub poll: PollConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("FETCH_FOX_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("FETCH_FOX_API_KEY must be set")?;

        let defaults = PollConfig::default();

        let max_attempts: u32 = parse_or(&lookup, "FETCH_FOX_POLL_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            bail!("FETCH_FOX_POLL_MAX_ATTEMPTS must be at least 1");
        }

        let multiplier: f64 = parse_or(&lookup, "FETCH_FOX_POLL_BACKOFF", defaults.multiplier)?;
        if !multiplier.is_finite() || multiplier < 1.0 {
            bail!("FETCH_FOX_POLL_BACKOFF must be a number >= 1.0");
        }

        let initial_ms: u64 = parse_or(
            &lookup,
            "FETCH_FOX_POLL_INTERVAL_MS",
            defaults.initial_interval.as_millis() as u64,
        )?;
        if initial_ms == 0 {
            bail!("FETCH_FOX_POLL_INTERVAL_MS must be at least 1");
        }
        let max_ms: u64 = parse_or(
            &lookup,
            "FETCH_FOX_POLL_MAX_INTERVAL_MS",
            defaults.max_interval.as_millis() as u64,
        )?;
        let timeout_secs: u64 = parse_or(
            &lookup,
            "FETCH_FOX_POLL_TIMEOUT_SECS",
            defaults.timeout.map(|t| t.as_secs()).unwrap_or(0),
        )?;

        let poll = PollConfig::default()
            .with_max_attempts(max_attempts)
            .with_initial_interval(Duration::from_millis(initial_ms))
            .with_max_interval(Duration::from_millis(max_ms.max(initial_ms)))
            .with_multiplier(multiplier)
            // 0 disables the overall deadline
            .with_timeout((timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)));

        Ok(Self {
            api_key,
            host: lookup("FETCH_FOX_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            http_timeout: Duration::from_secs(parse_or(&lookup, "FETCH_FOX_HTTP_TIMEOUT_SECS", 60)?),
            max_pages: parse_or(&lookup, "FETCH_FOX_MAX_PAGES", DEFAULT_MAX_PAGES)?,
            poll,
        })
    }

    /// HTTP client for the configured host and credential
    pub fn client(&self) -> Result<FetchFoxClient> {
        let client = FetchFoxClient::with_timeout(&self.api_key, self.http_timeout)
            .context("Failed to create FetchFox client")?;
        Ok(client.with_host(&self.host))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        _ => Ok(default),
    }
}
