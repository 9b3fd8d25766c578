//! Excel workbook output
//!
//! Every table becomes one worksheet of a single workbook.

use crate::catalog::Scalar;
use crate::output::traits::{OutputError, OutputResult, SheetData, Table, TableFormat};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Longest text Excel accepts in one cell, in characters
pub const MAX_CELL_CHARS: usize = 32_767;

/// Writes and reads `.xlsx` workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxFormat;

impl TableFormat for XlsxFormat {
    fn write_tables(&self, path: &Path, tables: &[Table]) -> OutputResult<()> {
        let mut workbook = Workbook::new();

        for table in tables {
            let sheet = workbook.add_worksheet();
            sheet.set_name(&table.name)?;

            for (col, header) in table.headers.iter().enumerate() {
                sheet.write_string(0, col as u16, header.as_str())?;
            }

            for (index, row) in table.rows.iter().enumerate() {
                let row_num = (index + 1) as u32;
                for (col, cell) in row.iter().enumerate() {
                    write_cell(sheet, row_num, col as u16, cell)?;
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }

    fn read_table(&self, path: &Path, preferred: &str) -> OutputResult<SheetData> {
        let mut workbook = open_workbook_auto(path)?;
        let names = workbook.sheet_names();

        let name = if names.iter().any(|n| n == preferred) {
            preferred.to_string()
        } else {
            names
                .first()
                .cloned()
                .ok_or_else(|| OutputError::Format(format!("{} has no sheets", path.display())))?
        };

        let range = workbook.worksheet_range(&name)?;
        let mut rows = range.rows();

        let headers = rows
            .next()
            .map(|header| {
                header
                    .iter()
                    .map(|cell| cell_to_scalar(cell).map(|s| s.to_string()).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        let rows = rows
            .map(|row| row.iter().map(cell_to_scalar).collect())
            .collect();

        Ok(SheetData {
            name,
            headers,
            rows,
        })
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Scalar) -> OutputResult<()> {
    match cell {
        Scalar::Text(text) if text.is_empty() => {}
        Scalar::Text(text) => match text.char_indices().nth(MAX_CELL_CHARS) {
            Some((cut, _)) => {
                tracing::warn!(
                    "Truncating {}-character cell at row {}, column {} to {} characters",
                    text.chars().count(),
                    row,
                    col,
                    MAX_CELL_CHARS
                );
                sheet.write_string(row, col, &text[..cut])?;
            }
            None => {
                sheet.write_string(row, col, text.as_str())?;
            }
        },
        Scalar::Int(value) => {
            sheet.write_number(row, col, *value as f64)?;
        }
        Scalar::Float(value) => {
            sheet.write_number(row, col, *value)?;
        }
        Scalar::Bool(value) => {
            sheet.write_boolean(row, col, *value)?;
        }
    }
    Ok(())
}

fn cell_to_scalar(cell: &Data) -> Option<Scalar> {
    match cell {
        Data::Int(value) => Some(Scalar::Int(*value)),
        Data::Float(value) => Some(Scalar::Float(*value)),
        Data::Bool(value) => Some(Scalar::Bool(*value)),
        Data::String(text) if text.is_empty() => None,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            Some(Scalar::Text(text.clone()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut first = Table::new("Level_1", &["Level", "Title", "AEM_URL"]);
        first.rows.push(vec![Scalar::Int(1), Scalar::from("TV"), Scalar::from("/a/b/c")]);
        first.rows.push(vec![Scalar::Int(1), Scalar::from(""), Scalar::from("/a/b/d")]);
        let mut second = Table::new("Level_2", &["Level", "Title", "AEM_URL"]);
        second.rows.push(vec![Scalar::Int(2), Scalar::from("OLED"), Scalar::from("/a/b/e")]);

        XlsxFormat.write_tables(&path, &[first, second]).unwrap();

        let sheet = XlsxFormat.read_table(&path, "Level_2").unwrap();
        assert_eq!(sheet.name, "Level_2");
        assert_eq!(sheet.headers, vec!["Level", "Title", "AEM_URL"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0][0].as_ref().and_then(Scalar::as_integer), Some(2));
        assert_eq!(sheet.rows[0][1], Some(Scalar::from("OLED")));

        let fallback = XlsxFormat.read_table(&path, "Level_9").unwrap();
        assert_eq!(fallback.name, "Level_1");
        assert_eq!(fallback.rows.len(), 2);
        assert_eq!(fallback.rows[1][1], None);
    }

    #[test]
    fn test_long_text_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.xlsx");

        let mut table = Table::new("products", &["shortDescription", "name"]);
        table.rows.push(vec![Scalar::Text("é".repeat(40_000)), Scalar::from("TV")]);

        XlsxFormat.write_tables(&path, &[table]).unwrap();

        let sheet = XlsxFormat.read_table(&path, "products").unwrap();
        let Some(Scalar::Text(text)) = &sheet.rows[0][0] else {
            panic!("expected text cell, got {:?}", sheet.rows[0][0]);
        };
        assert_eq!(text.chars().count(), MAX_CELL_CHARS);
        assert!(text.chars().all(|c| c == 'é'));
        assert_eq!(sheet.rows[0][1], Some(Scalar::from("TV")));
    }

    #[test]
    fn test_text_at_limit_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("limit.xlsx");

        let mut table = Table::new("products", &["name"]);
        table.rows.push(vec![Scalar::Text("x".repeat(MAX_CELL_CHARS))]);

        XlsxFormat.write_tables(&path, &[table]).unwrap();

        let sheet = XlsxFormat.read_table(&path, "products").unwrap();
        assert_eq!(sheet.rows[0][0], Some(Scalar::Text("x".repeat(MAX_CELL_CHARS))));
    }
}
