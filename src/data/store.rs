use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::loader::{RawTable, load_table};
use super::model::{BranchSummaryRecord, CellValue, PlacementStore, StudentRecord};

/// Columns of the per-student placement sheet.
pub const STUDENT_COLUMNS: [&str; 5] = ["Name", "Year", "Branch", "Company", "Package"];

/// Columns of the per-branch report sheet.
pub const REPORT_COLUMNS: [&str; 3] = ["Branch", "Eligible_Students", "Placed_Students"];

/// Structural problems that make a loaded sheet unusable.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("{sheet} sheet is missing required column '{column}' (found: {found:?})")]
    MissingColumn {
        sheet: &'static str,
        column: &'static str,
        found: Vec<String>,
    },
    #[error("{sheet} sheet, row {row}: '{column}' value '{value}' is not a number")]
    InvalidCount {
        sheet: &'static str,
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Load both sheets. Any failure is fatal: there is no partial-load mode.
pub fn load(students_path: &Path, report_path: &Path) -> Result<PlacementStore> {
    let students = students_from_table(&load_table(students_path)?)
        .with_context(|| format!("reading {}", students_path.display()))?;
    let summaries = branch_summaries_from_table(&load_table(report_path)?)
        .with_context(|| format!("reading {}", report_path.display()))?;

    let store = PlacementStore::new(students, summaries);
    if store.is_empty() {
        log::warn!("{} holds no placement rows; every chart will be empty", students_path.display());
    }
    log::info!(
        "Placement store ready: {} student rows, {} years, {} branches, {} report rows",
        store.len(),
        store.years.len(),
        store.branches.len(),
        store.branch_summaries.len()
    );
    Ok(store)
}

fn require<const N: usize>(
    table: &RawTable,
    sheet: &'static str,
    columns: [&'static str; N],
) -> Result<[usize; N], StoreError> {
    let mut idx = [0; N];
    for (slot, column) in idx.iter_mut().zip(columns) {
        *slot = table.column(column).ok_or_else(|| StoreError::MissingColumn {
            sheet,
            column,
            found: table.headers.iter().map(|h| h.trim().to_string()).collect(),
        })?;
    }
    Ok(idx)
}

/// Interpret the placement sheet. Packages that are not numbers become `None`.
pub fn students_from_table(table: &RawTable) -> Result<Vec<StudentRecord>, StoreError> {
    let [name, year, branch, company, package] = require(table, "placement", STUDENT_COLUMNS)?;

    let mut coerced = 0usize;
    let records: Vec<StudentRecord> = table
        .rows
        .iter()
        .map(|row| {
            let pkg = coerce_package(&row[package]);
            if pkg.is_none() && !row[package].is_null() {
                coerced += 1;
            }
            StudentRecord {
                name: row[name].as_text(),
                year: row[year].clone(),
                branch: row[branch].clone(),
                company: row[company].as_text(),
                package: pkg,
            }
        })
        .collect();

    if coerced > 0 {
        log::debug!("{coerced} package cells were not numeric and were treated as missing");
    }
    Ok(records)
}

/// Numeric coercion of a package cell: numbers pass through, text is parsed,
/// everything else is missing.
pub fn coerce_package(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Integer(_) | CellValue::Float(_) => cell.as_f64(),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::Null | CellValue::Bool(_) => None,
    }?;
    value.is_finite().then_some(value)
}

/// Interpret the branch report sheet. Rows without a branch are skipped.
pub fn branch_summaries_from_table(table: &RawTable) -> Result<Vec<BranchSummaryRecord>, StoreError> {
    let [branch, eligible, placed] = require(table, "report", REPORT_COLUMNS)?;

    let mut summaries = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let Some(name) = row[branch].as_text() else {
            log::debug!("report row {row_no} has no branch; skipped");
            continue;
        };
        summaries.push(BranchSummaryRecord {
            branch: name.trim().to_string(),
            eligible_students: coerce_count(&row[eligible], row_no, REPORT_COLUMNS[1])?,
            placed_students: coerce_count(&row[placed], row_no, REPORT_COLUMNS[2])?,
        });
    }
    Ok(summaries)
}

fn coerce_count(cell: &CellValue, row: usize, column: &'static str) -> Result<u64, StoreError> {
    match coerce_package(cell) {
        // Truncate toward zero like an integer cast; negatives clamp to zero.
        Some(v) => Ok(v.max(0.0) as u64),
        None => Err(StoreError::InvalidCount {
            sheet: "report",
            row,
            column,
            value: cell.to_string(),
        }),
    }
}
