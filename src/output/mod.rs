//! Output module for workbooks, CSV tables and run digests
//!
//! This module handles:
//! - Writing and reading the menu workbook
//! - Writing product tables, checkpoints and their summaries
//! - Generating the markdown digest of a run

mod csv_table;
mod markdown;
mod menu_workbook;
mod products;
pub mod stats;
mod traits;
mod xlsx;

pub use csv_table::CsvFormat;
pub use markdown::{format_markdown_summary, write_markdown_summary, RunSummary};
pub use menu_workbook::{
    level_sheet_name, load_categories, menu_tables, save_menu_workbook, LEVEL_3_SHEET, MENU_COLUMNS,
};
pub use products::{ProductOutput, SaveReport};
pub use stats::{build_product_summaries, count_by, dedupe_records, CountRow, ProductSummaries};
pub use traits::{OutputError, OutputResult, SheetData, Table, TableFormat};
pub use xlsx::{XlsxFormat, MAX_CELL_CHARS};

use std::path::Path;

/// Whether `path` names a CSV file (case-insensitive extension)
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Picks the table format for a path: `.csv` or, for anything else, `.xlsx`
pub fn format_for(path: &Path) -> Box<dyn TableFormat> {
    if is_csv(path) {
        Box::new(CsvFormat)
    } else {
        Box::new(XlsxFormat)
    }
}

/// Creates the parent directory of `path` if it has one
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_csv() {
        assert!(is_csv(Path::new("out/products.csv")));
        assert!(is_csv(Path::new("out/products.CSV")));
        assert!(!is_csv(Path::new("out/products.xlsx")));
        assert!(!is_csv(Path::new("products")));
    }

    #[test]
    fn test_ensure_parent_dir_bare_name() {
        assert!(ensure_parent_dir(Path::new("products.xlsx")).is_ok());
    }
}
