//! CSV output
//!
//! The primary table goes to the requested path; every further table is
//! written beside it as `<stem>_<table name>.csv`.

use crate::catalog::Scalar;
use crate::output::traits::{OutputResult, SheetData, Table, TableFormat};
use std::path::{Path, PathBuf};

/// Writes and reads CSV files
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl CsvFormat {
    /// Location of a secondary table written next to `path`
    pub fn companion_path(path: &Path, table_name: &str) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{}_{}.csv", stem, table_name))
    }

    fn write_table(path: &Path, table: &Table) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(Scalar::to_string))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl TableFormat for CsvFormat {
    fn write_tables(&self, path: &Path, tables: &[Table]) -> OutputResult<()> {
        for (index, table) in tables.iter().enumerate() {
            if index == 0 {
                Self::write_table(path, table)?;
            } else {
                Self::write_table(&Self::companion_path(path, &table.name), table)?;
            }
        }
        Ok(())
    }

    fn read_table(&self, path: &Path, _preferred: &str) -> OutputResult<SheetData> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| (!field.is_empty()).then(|| Scalar::from(field)))
                    .collect(),
            );
        }

        Ok(SheetData {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            headers,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_companion_path() {
        let path = Path::new("out/products.csv");
        assert_eq!(
            CsvFormat::companion_path(path, "brand_summary"),
            PathBuf::from("out/products_brand_summary.csv")
        );
    }

    #[test]
    fn test_write_triplet_and_read_primary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.csv");

        let mut products = Table::new("products", &["name", "buyable"]);
        products.rows.push(vec![Scalar::from("TV, 55\""), Scalar::Bool(true)]);
        let mut brands = Table::new("brand_summary", &["manufacturer", "Products"]);
        brands.rows.push(vec![Scalar::from("LG"), Scalar::Int(1)]);

        CsvFormat.write_tables(&path, &[products, brands]).unwrap();

        let brand_file = std::fs::read_to_string(dir.path().join("products_brand_summary.csv")).unwrap();
        assert_eq!(brand_file, "manufacturer,Products\nLG,1\n");

        let sheet = CsvFormat.read_table(&path, "ignored").unwrap();
        assert_eq!(sheet.name, "products");
        assert_eq!(sheet.headers, vec!["name", "buyable"]);
        assert_eq!(
            sheet.rows,
            vec![vec![Some(Scalar::from("TV, 55\"")), Some(Scalar::from("True"))]]
        );
    }
}
