//! Structural checks for the product list page
//!
//! Each check is a pure predicate over a [`PageSnapshot`]. A check never
//! navigates on its own; the runner hands it a freshly loaded page.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::dom::PageSnapshot;
use crate::error::{E2eError, E2eResult};

/// Exact text of the page heading
pub const EXPECTED_HEADING: &str = "Produktliste";

/// Header cells of the product table, in document order
pub const EXPECTED_HEADERS: [&str; 4] = ["ID", "Name", "Preis (EUR)", "Kategorie"];

/// Minimum number of data rows in the table body
pub const MIN_BODY_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    /// Exactly one <h1> reading "Produktliste"
    Heading,
    /// At least one <table>
    Table,
    /// The table has <thead> and <tbody>
    TableSections,
    /// The header cells match the expected labels
    HeaderRow,
    /// The table body has at least three rows
    RowCount,
}

impl Check {
    /// Every check, in suite order
    pub const ALL: [Check; 5] = [
        Check::Heading,
        Check::Table,
        Check::TableSections,
        Check::HeaderRow,
        Check::RowCount,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Check::Heading => "heading",
            Check::Table => "table",
            Check::TableSections => "table-sections",
            Check::HeaderRow => "header-row",
            Check::RowCount => "row-count",
        }
    }

    /// Title shown in reports
    pub fn description(&self) -> &'static str {
        match self {
            Check::Heading => "enthält eine Überschrift mit dem Text 'Produktliste'",
            Check::Table => "enthält eine Tabelle",
            Check::TableSections => "verwendet thead und tbody",
            Check::HeaderRow => "enthält die korrekten Tabellenüberschriften",
            Check::RowCount => "enthält mindestens drei Datenzeilen",
        }
    }

    /// Run the check against a loaded page
    pub fn evaluate(&self, page: &PageSnapshot) -> E2eResult<()> {
        match self {
            Check::Heading => self.heading(page),
            Check::Table => self.table(page),
            Check::TableSections => self.table_sections(page),
            Check::HeaderRow => self.header_row(page),
            Check::RowCount => self.row_count(page),
        }
    }

    fn heading(&self, page: &PageSnapshot) -> E2eResult<()> {
        let headings = page.select("h1");
        if headings.len() != 1 {
            return Err(E2eError::mismatch(
                self.name(),
                "exactly one <h1>",
                format!("{} <h1> elements", headings.len()),
            ));
        }

        let text = headings[0].text_content();
        if text != EXPECTED_HEADING {
            return Err(E2eError::mismatch(
                self.name(),
                format!("<h1> text {:?}", EXPECTED_HEADING),
                format!("{:?}", text),
            ));
        }
        Ok(())
    }

    fn table(&self, page: &PageSnapshot) -> E2eResult<()> {
        match page.count("table") {
            0 => Err(E2eError::mismatch(self.name(), "at least one <table>", "none")),
            _ => Ok(()),
        }
    }

    fn table_sections(&self, page: &PageSnapshot) -> E2eResult<()> {
        let missing: Vec<&str> = ["thead", "tbody"]
            .into_iter()
            .filter(|section| page.count(&format!("table {}", section)) == 0)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(E2eError::mismatch(
                self.name(),
                "<thead> and <tbody> inside <table>",
                format!("missing <{}>", missing.join(">, <")),
            ))
        }
    }

    fn header_row(&self, page: &PageSnapshot) -> E2eResult<()> {
        let cells: Vec<String> = page
            .select("table thead th")
            .iter()
            .map(|cell| cell.text_content())
            .collect();

        if cells.len() != EXPECTED_HEADERS.len() {
            return Err(E2eError::mismatch(
                self.name(),
                format!("{} header cells", EXPECTED_HEADERS.len()),
                format!("{} header cells {:?}", cells.len(), cells),
            ));
        }

        for (index, (actual, expected)) in cells.iter().zip(EXPECTED_HEADERS).enumerate() {
            if actual != expected {
                return Err(E2eError::mismatch(
                    self.name(),
                    format!("header[{}] {:?}", index, expected),
                    format!("header[{}] {:?}", index, actual),
                ));
            }
        }
        Ok(())
    }

    fn row_count(&self, page: &PageSnapshot) -> E2eResult<()> {
        let rows = page.count("table tbody tr");
        if rows < MIN_BODY_ROWS {
            return Err(E2eError::mismatch(
                self.name(),
                format!("at least {} rows in <tbody>", MIN_BODY_ROWS),
                format!("{} rows", rows),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
