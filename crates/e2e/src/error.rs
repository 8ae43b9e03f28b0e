//! Error types for E2E checks

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    /// Observed markup differs from the expected value
    #[error("Assertion failed in {check}: expected {expected}, got {actual}")]
    AssertionMismatch {
        check: String,
        expected: String,
        actual: String,
    },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Navigation to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("HTML parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    pub fn mismatch(
        check: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        E2eError::AssertionMismatch {
            check: check.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Anything other than a markup mismatch points at the environment.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, E2eError::AssertionMismatch { .. })
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
