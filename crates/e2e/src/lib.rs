//! Produktliste E2E checks
//!
//! This crate verifies the structure of the product list page:
//! - Resolves the base URL once (`BASE_URL`, default `http://localhost`)
//! - Loads `{base_url}/index.html` afresh before every check
//! - Runs five independent structural checks against the parsed DOM
//! - Reports every check and exits non-zero if any of them did not pass
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SuiteRunner                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SuiteConfig ── page_url() ──┐                              │
//! │                              ▼                              │
//! │  Navigator::navigate(url) -> PageSnapshot   (per check)     │
//! │                              │                              │
//! │                              ▼                              │
//! │  Check::evaluate(&PageSnapshot) -> E2eResult<()>            │
//! │    ├── heading         <h1> == "Produktliste"               │
//! │    ├── table           <table> exists                       │
//! │    ├── table-sections  table thead, table tbody             │
//! │    ├── header-row      table thead th == EXPECTED_HEADERS   │
//! │    └── row-count       table tbody tr >= 3                  │
//! │                              │                              │
//! │                              ▼                              │
//! │  CheckResult { Passed | Failed | Errored } -> SuiteResult   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod checks;
pub mod config;
pub mod dom;
pub mod error;
pub mod navigator;
pub mod report;
pub mod runner;

pub use checks::Check;
pub use config::SuiteConfig;
pub use error::{E2eError, E2eResult};
pub use navigator::{HttpNavigator, Navigator};
pub use runner::{CheckOutcome, CheckResult, SuiteResult, SuiteRunner};
