//! Page navigation
//!
//! The navigator is the seam to whatever actually loads the page. Every
//! call performs a fresh load and hands back an independent snapshot.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::config::SuiteConfig;
use crate::dom::PageSnapshot;
use crate::error::{E2eError, E2eResult};

/// Loads a page and returns its DOM
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, url: &str) -> E2eResult<PageSnapshot>;
}

/// Navigator backed by a plain HTTP GET and an HTML5 parse
pub struct HttpNavigator {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpNavigator {
    pub fn new(config: &SuiteConfig) -> E2eResult<Self> {
        Self::with_timeout(config.navigation_timeout())
    }

    pub fn with_timeout(timeout: Duration) -> E2eResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("produktliste-e2e/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn navigate(&self, url: &str) -> E2eResult<PageSnapshot> {
        let start = Instant::now();
        debug!("Navigating to {}", url);

        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                E2eError::Timeout(format!("page load of {} after {:?}", url, self.timeout))
            } else {
                E2eError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(E2eError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                E2eError::Timeout(format!("page body of {}", url))
            } else {
                E2eError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        debug!(
            "Loaded {} ({} bytes, {} ms)",
            url,
            body.len(),
            start.elapsed().as_millis()
        );
        PageSnapshot::parse(url, &body)
    }
}
