//! Menu workbook: the leveled category table written by menu mode and read
//! back by products mode

use crate::catalog::Scalar;
use crate::menu::{select_categories, CategoryRef, CategoryRow};
use crate::output::traits::{OutputResult, Table};
use crate::{Result, RippleError, SENTINEL};
use std::path::Path;

pub const MENU_COLUMNS: [&str; 6] = ["Level", "UniqueID", "ParentUniqueID", "Title", "SEO_URL", "AEM_URL"];
pub const LEVEL_3_SHEET: &str = "Level_3_UniqueIDs";

/// Sheet holding the rows of one level
pub fn level_sheet_name(level: u32) -> String {
    format!("Level_{}", level)
}

fn menu_cells(row: &CategoryRow) -> Vec<Scalar> {
    let id = |value: &Option<String>| Scalar::Text(value.clone().unwrap_or_default());
    let text = |value: &Option<String>| {
        Scalar::Text(value.clone().unwrap_or_else(|| SENTINEL.to_string()))
    };

    vec![
        Scalar::Int(i64::from(row.level)),
        id(&row.unique_id),
        id(&row.parent_unique_id),
        text(&row.title),
        text(&row.seo_url),
        text(&row.internal_url),
    ]
}

/// Lays the flat category table out as output tables
///
/// A workbook gets one sheet per level plus the level-3 id sheet; a CSV file
/// gets a single table with every level.
pub fn menu_tables(rows: &[CategoryRow], single_table: bool) -> Vec<Table> {
    if single_table {
        let mut table = Table::new("menu", &MENU_COLUMNS);
        table.rows = rows.iter().map(menu_cells).collect();
        return vec![table];
    }

    let max_level = rows.iter().map(|row| row.level).max().unwrap_or(1);
    let mut tables: Vec<Table> = (1..=max_level)
        .map(|level| {
            let mut table = Table::new(&level_sheet_name(level), &MENU_COLUMNS);
            table.rows = rows
                .iter()
                .filter(|row| row.level == level)
                .map(menu_cells)
                .collect();
            table
        })
        .collect();

    if !rows.is_empty() {
        let mut level_3 = Table::new(LEVEL_3_SHEET, &["UniqueID", "Title", "AEM_URL"]);
        level_3.rows = rows
            .iter()
            .filter(|row| row.level == 3)
            .map(|row| {
                let cells = menu_cells(row);
                vec![cells[1].clone(), cells[3].clone(), cells[5].clone()]
            })
            .collect();
        tables.push(level_3);
    }

    tables
}

/// Writes the menu workbook, creating parent directories as needed
pub fn save_menu_workbook(rows: &[CategoryRow], path: &Path) -> OutputResult<()> {
    super::ensure_parent_dir(path)?;

    let tables = menu_tables(rows, super::is_csv(path));
    super::format_for(path).write_tables(path, &tables)?;

    if rows.is_empty() {
        tracing::info!("Saved empty menu workbook to {}", path.display());
    } else {
        tracing::info!("Saved menu workbook ({} rows) to {}", rows.len(), path.display());
    }
    Ok(())
}

/// Loads the categories of `level` from a menu workbook or CSV table
///
/// # Errors
///
/// Fails when the file does not exist, cannot be read, or lacks an
/// `AEM_URL` column.
pub fn load_categories(
    path: &Path,
    level: u32,
    max_categories: Option<usize>,
) -> Result<Vec<CategoryRef>> {
    if !path.exists() {
        return Err(RippleError::MenuFileNotFound(path.display().to_string()));
    }

    let sheet = super::format_for(path).read_table(path, &level_sheet_name(level))?;
    tracing::debug!("Reading categories from sheet '{}' of {}", sheet.name, path.display());

    select_categories(&sheet, &path.display().to_string(), level, max_categories)
}
