//! Product statistics: deduplication and per-category / per-brand counts

use crate::catalog::ProductRecord;
use std::collections::{HashMap, HashSet};

/// One line of a count summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub label: String,
    pub products: usize,
}

/// Category and brand counts over a set of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSummaries {
    pub categories: Vec<CountRow>,
    pub brands: Vec<CountRow>,
}

/// Drops repeated `(uniqueID, partNumber, category id)` listings, keeping the first
pub fn dedupe_records(records: &[ProductRecord]) -> Vec<&ProductRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect()
}

/// Counts labels, ordered by descending count then first appearance
pub fn count_by<I>(labels: I) -> Vec<CountRow>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<CountRow> = Vec::new();

    for label in labels {
        match index.get(&label) {
            Some(&position) => rows[position].products += 1,
            None => {
                index.insert(label.clone(), rows.len());
                rows.push(CountRow { label, products: 1 });
            }
        }
    }

    // Stable sort keeps first-appearance order among ties
    rows.sort_by(|a, b| b.products.cmp(&a.products));
    rows
}

/// Builds the category and brand summaries
pub fn build_product_summaries(records: &[&ProductRecord]) -> ProductSummaries {
    ProductSummaries {
        categories: count_by(records.iter().map(|r| r.category_title())),
        brands: count_by(records.iter().map(|r| r.brand())),
    }
}
