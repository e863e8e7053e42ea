//! Check command implementation for mdnote CLI.
//!
//! Scans a notebook and validates its prerequisites without resolving
//! drivers or writing anything.

use mdnote_core::{Cell, ReferenceIssue, check_prerequisites, scan_notebook};
use serde::Serialize;

use crate::{colors, input};

#[derive(Serialize)]
struct CheckReport<'a> {
    cells: Vec<CellSummary<'a>>,
    issues: &'a [ReferenceIssue],
}

#[derive(Serialize)]
struct CellSummary<'a> {
    name: &'a str,
    line: usize,
    driver: &'a str,
    prerequisites: &'a [String],
}

impl<'a> From<&'a Cell> for CellSummary<'a> {
    fn from(cell: &'a Cell) -> Self {
        Self {
            name: &cell.name,
            line: cell.line,
            driver: &cell.driver,
            prerequisites: &cell.prerequisites,
        }
    }
}

/// Execute the check command.
pub fn execute(notebook: &str, json: bool) -> anyhow::Result<()> {
    let reader = input::open(notebook)?;
    let cells = scan_notebook(reader)?;
    let issues = check_prerequisites(&cells);

    if json {
        let report = CheckReport {
            cells: cells.iter().map(CellSummary::from).collect(),
            issues: &issues,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}{} cells{}", colors::BOLD, cells.len(), colors::RESET);
    for cell in &cells {
        if cell.prerequisites.is_empty() {
            println!("  {} [{}]", cell.name, cell.driver);
        } else {
            println!(
                "  {} ← {} [{}]",
                cell.name,
                cell.prerequisites.join(", "),
                cell.driver
            );
        }
    }

    if issues.is_empty() {
        println!("{}✓{} all prerequisites resolve", colors::GREEN, colors::RESET);
    } else {
        for issue in &issues {
            println!("{}warning:{} {}", colors::YELLOW, colors::RESET, issue);
        }
    }

    Ok(())
}
