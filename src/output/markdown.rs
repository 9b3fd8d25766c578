//! Markdown summary generation
//!
//! This module generates the human-readable digest of a collection run:
//! run counts, failed categories and the top categories and brands.

use crate::output::stats::{CountRow, ProductSummaries};
use crate::output::traits::OutputResult;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Rows shown in each top-N table
const TOP_ROWS: usize = 15;

/// Everything the digest reports about one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub generated_at: DateTime<Local>,
    pub total_categories: usize,
    /// Products after deduplication
    pub products_captured: usize,
    pub failed_categories: Vec<String>,
    pub config_hash: Option<String>,
    pub summaries: ProductSummaries,
}

/// Writes the markdown digest, creating parent directories as needed
///
/// # Arguments
///
/// * `summary` - The run summary data
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    super::ensure_parent_dir(output_path)?;
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Saved markdown summary to {}", output_path.display());
    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# Kotsovolos Catalog Summary\n\n");

    md.push_str(&format!(
        "- Generated at: {}\n",
        summary.generated_at.format("%Y-%m-%dT%H:%M:%S")
    ));
    md.push_str(&format!(
        "- Categories processed: {}\n",
        summary.total_categories
    ));
    md.push_str(&format!(
        "- Products captured: {}\n",
        summary.products_captured
    ));
    md.push_str(&format!(
        "- Failed categories: {}\n",
        summary.failed_categories.len()
    ));
    if !summary.failed_categories.is_empty() {
        md.push_str(&format!(
            "- Failed list: {}\n",
            summary.failed_categories.join(", ")
        ));
    }
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- Config hash: {}\n", hash));
    }

    push_top_table(&mut md, "Top Categories", "Category", &summary.summaries.categories);
    push_top_table(&mut md, "Top Brands", "Brand", &summary.summaries.brands);

    md
}

fn push_top_table(md: &mut String, heading: &str, label: &str, rows: &[CountRow]) {
    md.push_str(&format!("\n## {}\n\n", heading));
    md.push_str(&format!("| {} | Products |\n", label));
    md.push_str("|---|---:|\n");
    for row in rows.iter().take(TOP_ROWS) {
        md.push_str(&format!(
            "| {} | {} |\n",
            row.label.replace('|', "\\|"),
            row.products
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn count(label: &str, products: usize) -> CountRow {
        CountRow {
            label: label.to_string(),
            products,
        }
    }

    fn create_test_summary() -> RunSummary {
        RunSummary {
            generated_at: Local.with_ymd_and_hms(2024, 11, 29, 10, 30, 0).unwrap(),
            total_categories: 12,
            products_captured: 345,
            failed_categories: vec![],
            config_hash: None,
            summaries: ProductSummaries {
                categories: vec![count("TV", 200), count("Phones", 145)],
                brands: vec![count("LG", 120), count("A|B", 3)],
            },
        }
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_summary());

        assert!(markdown.starts_with("# Kotsovolos Catalog Summary\n\n"));
        assert!(markdown.contains("- Generated at: 2024-11-29T10:30:00\n"));
        assert!(markdown.contains("- Categories processed: 12\n"));
        assert!(markdown.contains("- Products captured: 345\n"));
        assert!(markdown.contains("- Failed categories: 0\n"));
        assert!(!markdown.contains("Failed list"));
        assert!(!markdown.contains("Config hash"));
        assert!(markdown.contains("## Top Categories\n\n| Category | Products |\n|---|---:|\n| TV | 200 |\n| Phones | 145 |\n"));
        assert!(markdown.contains("| A\\|B | 3 |"));
    }

    #[test]
    fn test_markdown_with_failures_and_hash() {
        let mut summary = create_test_summary();
        summary.failed_categories = vec!["Laptops".to_string(), "Audio".to_string()];
        summary.config_hash = Some("abc123".to_string());

        let markdown = format_markdown_summary(&summary);

        assert!(markdown.contains("- Failed categories: 2\n- Failed list: Laptops, Audio\n"));
        assert!(markdown.contains("- Config hash: abc123\n"));
    }

    #[test]
    fn test_top_tables_are_truncated() {
        let mut summary = create_test_summary();
        summary.summaries.brands = (0..20).map(|i| count(&format!("brand{}", i), 20 - i)).collect();

        let markdown = format_markdown_summary(&summary);

        assert!(markdown.contains("| brand14 | 6 |"));
        assert!(!markdown.contains("| brand15 |"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/summary.md");

        write_markdown_summary(&create_test_summary(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Top Brands"));
    }
}
