//! Suite configuration
//!
//! The effective configuration is resolved once per run and shared by the
//! navigator and the checks. Resolution order: defaults, then an optional
//! TOML file, then the `BASE_URL` environment variable. CLI flags are
//! applied last by the binary.

use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};

/// Fallback when `BASE_URL` is not provided
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Environment variable carrying the base URL override
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Page under test, relative to the base URL
pub const DEFAULT_PAGE: &str = "index.html";

/// Suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Root address the page path is resolved against
    pub base_url: String,

    /// Page path relative to `base_url`
    pub page: String,

    /// Timeout for a single page load
    pub navigation_timeout_ms: u64,

    /// How long a failing check keeps re-navigating before it is reported.
    /// Zero means every check is single-shot.
    pub wait_budget_ms: u64,

    /// Delay between attempts while the wait budget lasts
    pub retry_interval_ms: u64,

    /// Directory for `test-results.json`
    pub output_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page: DEFAULT_PAGE.to_string(),
            navigation_timeout_ms: 10_000,
            wait_budget_ms: 0,
            retry_interval_ms: 250,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl SuiteConfig {
    /// Resolve the configuration from an optional file and the process
    /// environment. Callers apply their own overrides, then `validated()`.
    pub fn resolve(path: Option<&Path>) -> E2eResult<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let base_url = base_url_from_env(std::env::var(BASE_URL_ENV))?;
        Ok(config.with_base_url_override(base_url))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> E2eResult<Self> {
        if !path.exists() {
            return Err(E2eError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply a base URL override. Empty values count as unset.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            let url = url.trim();
            if !url.is_empty() {
                self.base_url = url.to_string();
            }
        }
        self
    }

    /// Normalise and sanity-check the resolved values
    pub fn validated(mut self) -> E2eResult<Self> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self.page = self.page.trim().trim_start_matches('/').to_string();

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::Config(format!(
                "base URL must be http(s): {:?}",
                self.base_url
            )));
        }
        if self.page.is_empty() {
            return Err(E2eError::Config("page path is empty".to_string()));
        }
        if self.navigation_timeout_ms == 0 {
            return Err(E2eError::Config(
                "navigation timeout must be greater than zero".to_string(),
            ));
        }
        if self.wait_budget_ms > 0 && self.retry_interval_ms == 0 {
            return Err(E2eError::Config(
                "retry interval must be greater than zero when a wait budget is set".to_string(),
            ));
        }
        Ok(self)
    }

    /// Full URL of the page under test
    pub fn page_url(&self) -> String {
        format!("{}/{}", self.base_url, self.page)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn wait_budget(&self) -> Duration {
        Duration::from_millis(self.wait_budget_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

/// Interpret a `BASE_URL` lookup. Unset means no override; a value that is
/// not valid UTF-8 is rejected rather than ignored.
fn base_url_from_env(value: Result<String, VarError>) -> E2eResult<Option<String>> {
    match value {
        Ok(url) => Ok(Some(url)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(E2eError::Config(format!(
            "{} is not valid UTF-8: {:?}",
            BASE_URL_ENV, raw
        ))),
    }
}
