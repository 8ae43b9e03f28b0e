//! Produktliste E2E entry point
//!
//! Exit codes: 0 when every check passed, 1 when any check failed or
//! errored, 2 when the suite could not run.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use produktliste_e2e::report::{self, OutputFormat};
use produktliste_e2e::{Check, SuiteConfig, SuiteRunner};

#[derive(Parser, Debug)]
#[command(name = "produktliste-e2e")]
#[command(author, version, about = "Structural E2E checks for the Produktliste page")]
struct Args {
    /// Base URL of the site under test (overrides $BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Page path relative to the base URL
    #[arg(long)]
    page: Option<String>,

    /// Run only these checks (repeatable)
    #[arg(short, long = "check", value_enum)]
    checks: Vec<Check>,

    /// Output format for the per-check listing
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Page load timeout in milliseconds
    #[arg(long)]
    navigation_timeout_ms: Option<u64>,

    /// Keep retrying a failing check for this many milliseconds
    #[arg(long)]
    wait_ms: Option<u64>,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not write test-results.json
    #[arg(long)]
    no_report: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> anyhow::Result<i32> {
    let mut config = SuiteConfig::resolve(args.config.as_deref())?
        .with_base_url_override(args.base_url);
    if let Some(page) = args.page {
        config.page = page;
    }
    if let Some(ms) = args.navigation_timeout_ms {
        config.navigation_timeout_ms = ms;
    }
    if let Some(ms) = args.wait_ms {
        config.wait_budget_ms = ms;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    let config = config.validated()?;

    tracing::debug!("Effective configuration: {:?}", config);

    let runner = SuiteRunner::from_config(config)?;
    let result = if args.checks.is_empty() {
        runner.run_all().await
    } else {
        runner.run_checks(&args.checks).await
    };

    report::print(&result, args.format)?;

    if !args.no_report {
        runner.write_results(&result)?;
    }

    Ok(result.exit_code())
}
