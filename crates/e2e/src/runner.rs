//! Suite runner: one fresh navigation per check, aggregated results

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::checks::Check;
use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::navigator::{HttpNavigator, Navigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    /// The markup did not match
    Failed,
    /// The page could not be loaded
    Errored,
}

/// Result of running a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: Check,
    pub description: String,
    pub outcome: CheckOutcome,
    pub message: Option<String>,
    pub attempts: u32,
    pub duration_ms: u64,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome == CheckOutcome::Passed
    }
}

/// Result of running the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub page_url: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub duration_ms: u64,
    pub results: Vec<CheckResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Process exit status for CI: 0 when every check passed
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    pub fn get(&self, check: Check) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check == check)
    }
}

/// Runs checks sequentially against the configured page
pub struct SuiteRunner<N: Navigator> {
    config: SuiteConfig,
    navigator: N,
}

impl SuiteRunner<HttpNavigator> {
    /// Runner that loads the page over HTTP
    pub fn from_config(config: SuiteConfig) -> E2eResult<Self> {
        let navigator = HttpNavigator::new(&config)?;
        Ok(Self::new(config, navigator))
    }
}

impl<N: Navigator> SuiteRunner<N> {
    pub fn new(config: SuiteConfig, navigator: N) -> Self {
        Self { config, navigator }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every check in suite order
    pub async fn run_all(&self) -> SuiteResult {
        self.run_checks(&Check::ALL).await
    }

    /// Run a subset of checks. Failures never stop the remaining checks.
    pub async fn run_checks(&self, checks: &[Check]) -> SuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::with_capacity(checks.len());

        info!(
            "Running {} check(s) against {}",
            checks.len(),
            self.config.page_url()
        );

        for check in checks {
            let result = self.run_check(*check).await;
            match result.outcome {
                CheckOutcome::Passed => {
                    info!("✓ {} ({} ms)", result.description, result.duration_ms)
                }
                CheckOutcome::Failed => error!(
                    "✗ {} - {}",
                    result.description,
                    result.message.as_deref().unwrap_or("assertion failed")
                ),
                CheckOutcome::Errored => error!(
                    "✗ {} - infrastructure error: {}",
                    result.description,
                    result.message.as_deref().unwrap_or("unknown error")
                ),
            }
            results.push(result);
        }

        let count = |outcome| results.iter().filter(|r| r.outcome == outcome).count();
        let passed = count(CheckOutcome::Passed);
        let failed = count(CheckOutcome::Failed);
        let errored = count(CheckOutcome::Errored);
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Check results: {} passed, {} failed, {} errored ({} ms)",
            passed, failed, errored, duration_ms
        );

        SuiteResult {
            page_url: self.config.page_url(),
            started_at,
            total: results.len(),
            passed,
            failed,
            errored,
            duration_ms,
            results,
        }
    }

    /// Run a single check on a freshly loaded page, retrying within the
    /// configured wait budget.
    pub async fn run_check(&self, check: Check) -> CheckResult {
        let url = self.config.page_url();
        let budget = self.config.wait_budget();
        let interval = self.config.retry_interval();
        let start = Instant::now();
        let mut attempts = 0;

        let outcome = loop {
            attempts += 1;
            debug!("{}: attempt {}", check, attempts);

            let attempt = match self.navigator.navigate(&url).await {
                Ok(page) => check.evaluate(&page),
                Err(e) => Err(e),
            };

            match attempt {
                Ok(()) => break Ok(()),
                Err(e) if start.elapsed() + interval <= budget => {
                    warn!("{}: {} (retrying)", check, e);
                    sleep(interval).await;
                }
                Err(e) => break Err(e),
            }
        };

        let (outcome, message) = match outcome {
            Ok(()) => (CheckOutcome::Passed, None),
            Err(e) => (classify(&e), Some(e.to_string())),
        };

        CheckResult {
            check,
            description: check.description().to_string(),
            outcome,
            message,
            attempts,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Write suite results to `test-results.json` in the output directory
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

fn classify(err: &E2eError) -> CheckOutcome {
    if err.is_infrastructure() {
        CheckOutcome::Errored
    } else {
        CheckOutcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PageSnapshot;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VALID: &str = "<h1>Produktliste</h1><table>\
        <thead><tr><th>ID</th><th>Name</th><th>Preis (EUR)</th><th>Kategorie</th></tr></thead>\
        <tbody><tr>...</tr><tr>...</tr><tr>...</tr></tbody></table>";

    const TWO_ROWS: &str = "<h1>Produktliste</h1><table>\
        <thead><tr><th>ID</th><th>Name</th><th>Preis (EUR)</th><th>Kategorie</th></tr></thead>\
        <tbody><tr>...</tr><tr>...</tr></tbody></table>";

    /// Serves a fixed sequence of pages; `None` simulates an unreachable host.
    /// The last entry repeats once the sequence is exhausted.
    struct ScriptedNavigator {
        pages: Vec<Option<&'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedNavigator {
        fn new(pages: Vec<Option<&'static str>>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Navigator for ScriptedNavigator {
        async fn navigate(&self, url: &str) -> E2eResult<PageSnapshot> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let index = call.min(self.pages.len() - 1);
            match self.pages[index] {
                Some(html) => PageSnapshot::parse(url, html),
                None => Err(E2eError::Navigation {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                }),
            }
        }
    }

    fn config() -> SuiteConfig {
        SuiteConfig {
            retry_interval_ms: 5,
            ..SuiteConfig::default()
        }
    }

    #[tokio::test]
    async fn test_all_checks_pass() {
        let runner = SuiteRunner::new(config(), ScriptedNavigator::new(vec![Some(VALID)]));
        let result = runner.run_all().await;

        assert_eq!(result.total, 5);
        assert_eq!(result.passed, 5);
        assert!(result.success());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.page_url, "http://localhost/index.html");
    }

    #[tokio::test]
    async fn test_each_check_navigates_fresh() {
        let runner = SuiteRunner::new(config(), ScriptedNavigator::new(vec![Some(VALID)]));
        runner.run_all().await;
        assert_eq!(runner.navigator.calls(), 5);
    }

    #[tokio::test]
    async fn test_failure_does_not_block_other_checks() {
        let runner = SuiteRunner::new(config(), ScriptedNavigator::new(vec![Some(TWO_ROWS)]));
        let result = runner.run_all().await;

        assert_eq!(result.passed, 4);
        assert_eq!(result.failed, 1);
        assert_eq!(result.exit_code(), 1);

        let rows = result.get(Check::RowCount).unwrap();
        assert_eq!(rows.outcome, CheckOutcome::Failed);
        assert!(rows.message.as_deref().unwrap().contains("2 rows"));
    }

    #[tokio::test]
    async fn test_navigation_failure_is_errored_not_failed() {
        // Second navigation (the table check) fails, the rest load fine
        let runner = SuiteRunner::new(
            config(),
            ScriptedNavigator::new(vec![Some(VALID), None, Some(VALID)]),
        );
        let result = runner.run_all().await;

        assert_eq!(result.get(Check::Table).unwrap().outcome, CheckOutcome::Errored);
        assert_eq!(result.errored, 1);
        assert_eq!(result.failed, 0);
        assert_eq!(result.passed, 4);
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_wait_budget_retries_until_pass() {
        let config = SuiteConfig {
            wait_budget_ms: 2_000,
            ..config()
        };
        let runner = SuiteRunner::new(
            config,
            ScriptedNavigator::new(vec![None, Some(TWO_ROWS), Some(VALID)]),
        );
        let result = runner.run_check(Check::RowCount).await;

        assert!(result.passed());
        assert_eq!(result.attempts, 3);
    }

    #[tokio::test]
    async fn test_single_shot_without_budget() {
        let runner = SuiteRunner::new(
            config(),
            ScriptedNavigator::new(vec![Some(TWO_ROWS), Some(VALID)]),
        );
        let result = runner.run_check(Check::RowCount).await;

        assert_eq!(result.outcome, CheckOutcome::Failed);
        assert_eq!(result.attempts, 1);
    }

    #[tokio::test]
    async fn test_exhausted_budget_reports_last_failure() {
        let config = SuiteConfig {
            wait_budget_ms: 50,
            retry_interval_ms: 5,
            ..SuiteConfig::default()
        };
        let runner = SuiteRunner::new(config, ScriptedNavigator::new(vec![Some(TWO_ROWS)]));
        let result = runner.run_check(Check::RowCount).await;

        assert_eq!(result.outcome, CheckOutcome::Failed);
        assert!(result.attempts > 1);
        assert_eq!(runner.navigator.calls(), result.attempts as usize);
        assert!(result.message.as_deref().unwrap().contains("2 rows"));
    }

    #[tokio::test]
    async fn test_exhausted_budget_keeps_infrastructure_outcome() {
        let config = SuiteConfig {
            wait_budget_ms: 50,
            retry_interval_ms: 5,
            ..SuiteConfig::default()
        };
        let runner = SuiteRunner::new(config, ScriptedNavigator::new(vec![None]));
        let result = runner.run_check(Check::Heading).await;

        assert_eq!(result.outcome, CheckOutcome::Errored);
        assert!(result.attempts > 1);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let runner = SuiteRunner::new(config(), ScriptedNavigator::new(vec![Some(TWO_ROWS)]));
        let first = runner.run_all().await;
        let second = runner.run_all().await;

        let outcomes = |r: &SuiteResult| -> Vec<(Check, CheckOutcome)> {
            r.results.iter().map(|c| (c.check, c.outcome)).collect()
        };
        assert_eq!(outcomes(&first), outcomes(&second));
    }

    #[tokio::test]
    async fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let config = SuiteConfig {
            output_dir: dir.path().join("out"),
            ..config()
        };
        let runner = SuiteRunner::new(config, ScriptedNavigator::new(vec![Some(VALID)]));
        let result = runner.run_checks(&[Check::Heading]).await;

        let path = runner.write_results(&result).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["total"], 1);
        assert_eq!(written["results"][0]["check"], "heading");
        assert_eq!(written["results"][0]["outcome"], "passed");
    }
}
