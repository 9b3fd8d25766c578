//! Product output: the products table, its summaries and the markdown digest

use crate::catalog::{ProductRecord, Scalar, PRODUCT_COLUMNS};
use crate::output::markdown::{write_markdown_summary, RunSummary};
use crate::output::stats::{build_product_summaries, dedupe_records, CountRow, ProductSummaries};
use crate::output::traits::{OutputResult, Table};
use std::path::{Path, PathBuf};

/// Where and how product output is written
#[derive(Debug, Clone)]
pub struct ProductOutput {
    /// Final output file; `.csv` selects the CSV triplet, anything else `.xlsx`
    pub path: PathBuf,
    pub summary_markdown: Option<PathBuf>,
    pub config_hash: Option<String>,
}

/// What one write produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    /// Rows written after deduplication
    pub rows: usize,
}

impl ProductOutput {
    pub fn new(path: impl Into<PathBuf>, summary_markdown: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            summary_markdown,
            config_hash: None,
        }
    }

    pub fn with_config_hash(mut self, config_hash: Option<String>) -> Self {
        self.config_hash = config_hash;
        self
    }

    /// Checkpoint file beside the output: `<stem>_progress<.ext>`
    pub fn progress_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.path.extension() {
            Some(ext) => format!("{}_progress.{}", stem, ext.to_string_lossy()),
            None => format!("{}_progress", stem),
        };
        self.path.with_file_name(name)
    }

    /// Writes a partial checkpoint; never produces the markdown digest
    pub fn save_progress(&self, records: &[ProductRecord]) -> OutputResult<SaveReport> {
        let path = self.progress_path();
        let (rows, _) = write_products(&path, records)?;
        Ok(SaveReport { path, rows })
    }

    /// Writes the final output and, when configured, the markdown digest
    pub fn save(
        &self,
        records: &[ProductRecord],
        total_categories: usize,
        failed_categories: &[String],
    ) -> OutputResult<SaveReport> {
        let (rows, summaries) = write_products(&self.path, records)?;

        if let Some(summary_path) = &self.summary_markdown {
            let summary = RunSummary {
                generated_at: chrono::Local::now(),
                total_categories,
                products_captured: rows,
                failed_categories: failed_categories.to_vec(),
                config_hash: self.config_hash.clone(),
                summaries,
            };
            write_markdown_summary(&summary, summary_path)?;
        }

        Ok(SaveReport {
            path: self.path.clone(),
            rows,
        })
    }
}

/// Deduplicates `records` and writes the products and summary tables
fn write_products(path: &Path, records: &[ProductRecord]) -> OutputResult<(usize, ProductSummaries)> {
    super::ensure_parent_dir(path)?;

    let unique = dedupe_records(records);
    let summaries = build_product_summaries(&unique);

    let mut products = Table::new("products", &PRODUCT_COLUMNS);
    products.rows = unique.iter().map(|record| record.to_row()).collect();

    let tables = [
        products,
        summary_table("category_summary", "Category_Title", &summaries.categories),
        summary_table("brand_summary", "manufacturer", &summaries.brands),
    ];
    super::format_for(path).write_tables(path, &tables)?;

    tracing::info!(
        "Saved product output ({} rows) to {}",
        unique.len(),
        path.display()
    );
    Ok((unique.len(), summaries))
}

fn summary_table(name: &str, label_column: &str, counts: &[CountRow]) -> Table {
    let mut table = Table::new(name, &[label_column, "Products"]);
    table.rows = counts
        .iter()
        .map(|row| vec![Scalar::Text(row.label.clone()), Scalar::Int(row.products as i64)])
        .collect();
    table
}
