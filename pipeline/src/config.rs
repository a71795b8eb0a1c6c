//! Pipeline configuration
//!
//! Settings are loaded from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! Command line flags override both (see `main.rs`).
//!
//! ## Variables
//! - `PIPELINE_API_URL`: base URL of the deals API (default `http://127.0.0.1:3000`)
//! - `PIPELINE_PAGE_SIZE`: deals per fetch, capped at 100
//! - `PIPELINE_TIMEOUT_MS`: HTTP request timeout
//! - `PIPELINE_STALE_AFTER_SECS`: age after which a cached page is refetched
//! - `PIPELINE_SCOPE_VERSION`: organizational scope of the cached queries
//! - `PIPELINE_LOCALE_FILE`: JSON translation catalog

use std::path::PathBuf;
use std::time::Duration;

use shared::messages::MAX_PAGE_SIZE;
use shared::{process_warn, ProcessId, ScopeVersion};
use url::Url;

use crate::error::{PipelineError, PipelineResult};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STALE_AFTER_SECS: u64 = 30;

/// Runtime configuration for the board engine and its HTTP services
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub api_base_url: Url,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub stale_after: Duration,
    pub scope_version: ScopeVersion,
    pub locale_file: Option<PathBuf>,
}

impl PipelineConfig {
    /// Configuration with default settings against the given API
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            page_size: MAX_PAGE_SIZE,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
            scope_version: ScopeVersion::default(),
            locale_file: None,
        }
    }

    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> PipelineResult<Self> {
        // Missing .env is fine; already-set variables win
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("PIPELINE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(parse_api_url(&url)?);

        if let Some(size) = lookup("PIPELINE_PAGE_SIZE") {
            config = config.with_page_size(parse_number("PIPELINE_PAGE_SIZE", &size)?)?;
        }
        if let Some(ms) = lookup("PIPELINE_TIMEOUT_MS") {
            let ms: u64 = parse_number("PIPELINE_TIMEOUT_MS", &ms)?;
            if ms == 0 {
                return Err(PipelineError::config("PIPELINE_TIMEOUT_MS must be positive"));
            }
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = lookup("PIPELINE_STALE_AFTER_SECS") {
            config.stale_after = Duration::from_secs(parse_number("PIPELINE_STALE_AFTER_SECS", &secs)?);
        }
        if let Some(scope) = lookup("PIPELINE_SCOPE_VERSION") {
            config.scope_version = ScopeVersion(parse_number("PIPELINE_SCOPE_VERSION", &scope)?);
        }
        if let Some(path) = lookup("PIPELINE_LOCALE_FILE").filter(|p| !p.trim().is_empty()) {
            config.locale_file = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: &str) -> PipelineResult<Self> {
        self.api_base_url = parse_api_url(url)?;
        Ok(self)
    }

    /// Set the page size; values above the API maximum are capped
    pub fn with_page_size(mut self, page_size: u32) -> PipelineResult<Self> {
        if page_size == 0 {
            return Err(PipelineError::config("page size must be at least 1"));
        }
        if page_size > MAX_PAGE_SIZE {
            process_warn!(
                ProcessId::current(),
                "Page size {} exceeds the API maximum, using {}",
                page_size,
                MAX_PAGE_SIZE
            );
        }
        self.page_size = page_size.min(MAX_PAGE_SIZE);
        Ok(self)
    }

    /// Absolute URL for an API path, keeping any path prefix of the base URL
    pub fn endpoint(&self, path: &str) -> PipelineResult<Url> {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|e| PipelineError::config(format!("invalid endpoint '{path}': {e}")))
    }
}

fn parse_api_url(url: &str) -> PipelineResult<Url> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| PipelineError::config(format!("invalid API URL '{url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PipelineError::config(format!("API URL must be http(s): {url}")));
    }
    Ok(parsed)
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> PipelineResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| PipelineError::ConfigError { message: format!("{name} is not a valid number: '{raw}'") })
}
