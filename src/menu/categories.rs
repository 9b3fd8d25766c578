//! Selection of categories to collect from the persisted menu table

use crate::output::SheetData;
use crate::{Result, RippleError, SENTINEL};
use std::collections::HashSet;

pub const LEVEL_COLUMN: &str = "Level";
pub const UNIQUE_ID_COLUMN: &str = "UniqueID";
pub const TITLE_COLUMN: &str = "Title";
pub const AEM_URL_COLUMN: &str = "AEM_URL";

/// One category selected for product collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub unique_id: Option<String>,
    pub title: Option<String>,
    /// Trimmed, non-empty internal URL; unique within a selection
    pub aem_url: String,
}

impl CategoryRef {
    /// Title for logs and the failed-category list
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(SENTINEL)
    }
}

/// Picks the categories at `level` from a menu sheet
///
/// Rows are filtered by the `Level` column when the sheet has one. Rows with
/// a blank or repeated `AEM_URL` are dropped (first occurrence kept), and the
/// result is capped at `max_categories`. A sheet without an `AEM_URL` column
/// is a fatal error.
pub fn select_categories(
    sheet: &SheetData,
    source: &str,
    level: u32,
    max_categories: Option<usize>,
) -> Result<Vec<CategoryRef>> {
    let aem_column = sheet
        .column(AEM_URL_COLUMN)
        .ok_or_else(|| RippleError::MissingColumn {
            column: AEM_URL_COLUMN.to_string(),
            sheet: sheet.name.clone(),
            path: source.to_string(),
        })?;
    let level_column = sheet.column(LEVEL_COLUMN);
    let id_column = sheet.column(UNIQUE_ID_COLUMN);
    let title_column = sheet.column(TITLE_COLUMN);

    let mut seen = HashSet::new();
    let mut categories = Vec::new();

    for row in &sheet.rows {
        if let Some(index) = level_column {
            let row_level = sheet.cell(row, index).and_then(|cell| cell.as_integer());
            if row_level != Some(i64::from(level)) {
                continue;
            }
        }

        let Some(aem_url) = sheet
            .cell(row, aem_column)
            .map(|cell| cell.to_string().trim().to_string())
            .filter(|url| !url.is_empty())
        else {
            continue;
        };

        if !seen.insert(aem_url.clone()) {
            continue;
        }

        let text = |column: Option<usize>| {
            column
                .and_then(|index| sheet.cell(row, index))
                .map(|cell| cell.to_string())
        };

        categories.push(CategoryRef {
            unique_id: text(id_column),
            title: text(title_column),
            aem_url,
        });
    }

    if let Some(max) = max_categories {
        categories.truncate(max);
    }

    Ok(categories)
}
