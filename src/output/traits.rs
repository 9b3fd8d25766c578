//! Output format traits and tabular data types
//!
//! This module defines the trait interface for tabular writers and the
//! in-memory tables passed to them and read back from them.

use crate::catalog::Scalar;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A named table to be written as a sheet or a CSV file
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Sheet name, or the suffix of a secondary CSV file
    pub name: String,
    pub headers: Vec<String>,
    /// Fully rendered cells; an empty `Text` is written as a blank cell
    pub rows: Vec<Vec<Scalar>>,
}

impl Table {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// One sheet read back from a workbook or CSV file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    /// Cells by row; blank cells are `None`
    pub rows: Vec<Vec<Option<Scalar>>>,
}

impl SheetData {
    /// Index of the column with this exact header
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at `index` in `row`, if present and non-blank
    pub fn cell<'a>(&self, row: &'a [Option<Scalar>], index: usize) -> Option<&'a Scalar> {
        row.get(index).and_then(Option::as_ref)
    }
}

/// Trait for tabular output formats
///
/// The first table is the primary one; formats that hold a single table per
/// file place the others beside it.
pub trait TableFormat {
    /// Writes all tables for one logical output at `path`
    fn write_tables(&self, path: &Path, tables: &[Table]) -> OutputResult<()>;

    /// Reads the table named `preferred`, or the first one if there is no such table
    fn read_table(&self, path: &Path, preferred: &str) -> OutputResult<SheetData>;
}
