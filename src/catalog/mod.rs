//! Catalog data model and extraction
//!
//! - `Scalar`: loosely-typed upstream values, rendered to the sentinel at output time
//! - `category`: internal-URL parsing and category metadata resolution
//! - `product`: product entry extraction (prices, campaign flag, SEO URL)

mod category;
mod product;
mod scalar;

pub use category::{
    parse_internal_url_path, resolve_category_metadata, CategoryInfo, CategoryMetadata,
    CategoryPath, InvalidInternalUrl,
};
pub use product::{
    extract_black_friday_flag, extract_prices, extract_seo_url, parse_product_entry,
    ProductRecord, PRODUCT_COLUMNS,
};
pub use scalar::Scalar;
