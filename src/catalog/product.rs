//! Product entry extraction
//!
//! Turns one `catalogEntryView` entry into a flat [`ProductRecord`]. Every
//! field is optional internally; the sentinel is only substituted by
//! [`ProductRecord::to_row`].

use crate::catalog::{CategoryInfo, Scalar};
use crate::SENTINEL;
use serde_json::{Map, Value};

/// Substring that marks a product as part of the promotional campaign
const CAMPAIGN_MARKER: &str = "black friday";

/// Column headers for product output, in row order
pub const PRODUCT_COLUMNS: [&str; 17] = [
    "Category_Source_UniqueID",
    "Category_Source_Title",
    "Category_AEM_URL",
    "Category_ID_number",
    "Category_Title",
    "Category_URL",
    "uniqueID",
    "singleSKUCatalogEntryID",
    "partNumber",
    "shortDescription",
    "name",
    "manufacturer",
    "buyable",
    "Black_Friday_Campaign",
    "seo_url",
    "Original_Price",
    "Current_Price",
];

/// One flattened product with its category linkage
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub category: CategoryInfo,
    pub unique_id: Option<Scalar>,
    pub single_sku_catalog_entry_id: Option<Scalar>,
    pub part_number: Option<Scalar>,
    pub short_description: Option<Scalar>,
    pub name: Option<Scalar>,
    pub manufacturer: Option<Scalar>,
    pub buyable: Option<Scalar>,
    pub black_friday_campaign: bool,
    pub seo_url: Option<Scalar>,
    pub original_price: Option<Scalar>,
    pub current_price: Option<Scalar>,
}

impl ProductRecord {
    /// Renders the record in [`PRODUCT_COLUMNS`] order, category columns first
    pub fn to_row(&self) -> Vec<Scalar> {
        let category = &self.category;
        let text = |value: &Option<String>| {
            value
                .clone()
                .map(Scalar::Text)
                .unwrap_or_else(|| Scalar::from(SENTINEL))
        };

        vec![
            text(&category.source_unique_id),
            text(&category.source_title),
            Scalar::Text(category.aem_url.clone()),
            Scalar::or_sentinel(category.metadata.category_id.as_ref()),
            Scalar::or_sentinel(category.metadata.title.as_ref()),
            Scalar::or_sentinel(category.metadata.url.as_ref()),
            Scalar::or_sentinel(self.unique_id.as_ref()),
            Scalar::or_sentinel(self.single_sku_catalog_entry_id.as_ref()),
            Scalar::or_sentinel(self.part_number.as_ref()),
            Scalar::or_sentinel(self.short_description.as_ref()),
            Scalar::or_sentinel(self.name.as_ref()),
            Scalar::or_sentinel(self.manufacturer.as_ref()),
            Scalar::or_sentinel(self.buyable.as_ref()),
            Scalar::Bool(self.black_friday_campaign),
            Scalar::or_sentinel(self.seo_url.as_ref()),
            Scalar::or_sentinel(self.original_price.as_ref()),
            Scalar::or_sentinel(self.current_price.as_ref()),
        ]
    }

    /// Identity used to drop duplicate listings of the same product in a category
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            Scalar::text_or_sentinel(self.unique_id.as_ref()),
            Scalar::text_or_sentinel(self.part_number.as_ref()),
            Scalar::text_or_sentinel(self.category.metadata.category_id.as_ref()),
        )
    }

    /// Category title used for the category summary
    pub fn category_title(&self) -> String {
        Scalar::text_or_sentinel(self.category.metadata.title.as_ref())
    }

    /// Manufacturer used for the brand summary
    pub fn brand(&self) -> String {
        Scalar::text_or_sentinel(self.manufacturer.as_ref())
    }
}

/// Extracts one product entry under the given category
pub fn parse_product_entry(product: &Map<String, Value>, category: &CategoryInfo) -> ProductRecord {
    let (original_price, current_price) = extract_prices(product);

    ProductRecord {
        category: category.clone(),
        unique_id: Scalar::field(product, "uniqueID"),
        single_sku_catalog_entry_id: Scalar::field(product, "singleSKUCatalogEntryID"),
        part_number: Scalar::field(product, "partNumber"),
        short_description: Scalar::field(product, "shortDescription"),
        name: Scalar::field(product, "name"),
        manufacturer: Scalar::field(product, "manufacturer"),
        buyable: Scalar::field(product, "buyable"),
        black_friday_campaign: extract_black_friday_flag(product),
        seo_url: extract_seo_url(product),
        original_price,
        current_price,
    }
}

/// Returns `(original, current)` from the `Display` and `Offer` price entries
///
/// Later entries with the same usage overwrite earlier ones.
pub fn extract_prices(product: &Map<String, Value>) -> (Option<Scalar>, Option<Scalar>) {
    let mut original_price = None;
    let mut current_price = None;

    let Some(prices) = product.get("price").and_then(Value::as_array) else {
        return (original_price, current_price);
    };

    for price in prices.iter().filter_map(Value::as_object) {
        match price.get("usage").and_then(Value::as_str) {
            Some("Display") => original_price = Scalar::field(price, "value"),
            Some("Offer") => current_price = Scalar::field(price, "value"),
            _ => {}
        }
    }

    (original_price, current_price)
}

/// True when any attribute value mentions the campaign, case-insensitively
pub fn extract_black_friday_flag(product: &Map<String, Value>) -> bool {
    let Some(attributes) = product.get("attributes").and_then(Value::as_array) else {
        return false;
    };

    attributes
        .iter()
        .filter_map(|attr| attr.get("values").and_then(Value::as_array))
        .flatten()
        .filter_map(|value| value.as_object()?.get("value").and_then(Scalar::from_json))
        .any(|text| text.to_string().to_lowercase().contains(CAMPAIGN_MARKER))
}

/// The `seo_url` of the first `UserData` object
pub fn extract_seo_url(product: &Map<String, Value>) -> Option<Scalar> {
    product
        .get("UserData")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(Value::as_object)
        .and_then(|entry| Scalar::field(entry, "seo_url"))
}
