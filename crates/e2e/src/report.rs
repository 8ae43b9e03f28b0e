//! Output formatting for suite results

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::error::E2eResult;
use crate::runner::{CheckOutcome, CheckResult, SuiteResult};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text format
    Plain,
}

fn outcome_label(outcome: CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Passed => "✓ passed",
        CheckOutcome::Failed => "✗ failed",
        CheckOutcome::Errored => "! error",
    }
}

fn row(result: &CheckResult) -> Vec<String> {
    vec![
        result.check.name().to_string(),
        result.description.clone(),
        outcome_label(result.outcome).to_string(),
        result.message.clone().unwrap_or_default(),
    ]
}

/// Render the per-check listing plus a summary line
pub fn render(result: &SuiteResult, format: OutputFormat) -> E2eResult<String> {
    let out = match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec!["Check", "Description", "Result", "Details"]);
            for check in &result.results {
                table.add_row(row(check));
            }

            format!("{table}\n{}", summary(result))
        }
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Plain => {
            let mut out = String::new();
            for check in &result.results {
                out.push_str(&format!(
                    "{}: {}",
                    outcome_label(check.outcome),
                    check.description
                ));
                if let Some(message) = &check.message {
                    out.push_str(&format!(" ({})", message));
                }
                out.push('\n');
            }
            out.push_str(&summary(result));
            out
        }
    };
    Ok(out)
}

fn summary(result: &SuiteResult) -> String {
    format!(
        "{} | {} passed, {} failed, {} errored of {} ({} ms)",
        if result.success() { "PASS" } else { "FAIL" },
        result.passed,
        result.failed,
        result.errored,
        result.total,
        result.duration_ms
    )
}

/// Print the rendered report to stdout
pub fn print(result: &SuiteResult, format: OutputFormat) -> E2eResult<()> {
    println!("{}", render(result, format)?);
    Ok(())
}
