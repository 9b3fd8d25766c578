//! Crawler module for upstream JSON fetching and product collection
//!
//! This module contains the network-facing logic, including:
//! - HTTP fetching with retry logic
//! - Endpoint URL construction
//! - Menu harvesting
//! - The paginated product collection loop

mod coordinator;
pub mod endpoints;
mod fetcher;
#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{collect_products, CollectionReport, Collector};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, JsonSource, RetryPolicy};

use crate::config::EndpointConfig;
use crate::menu::{build_menu_rows, CategoryRow};
use crate::{Result, RippleError};

/// Fetches the navigation document and flattens its products subtree
///
/// # Arguments
///
/// * `source` - Where to fetch the navigation document from
/// * `endpoints` - Upstream endpoint configuration
///
/// # Returns
///
/// * `Ok(Vec<CategoryRow>)` - Every category node, parents before children
/// * `Err(RippleError)` - The payload was missing or not a list
pub async fn harvest_menu<S: JsonSource>(
    source: &S,
    endpoints: &EndpointConfig,
) -> Result<Vec<CategoryRow>> {
    tracing::info!("Fetching menu from {}", endpoints.menu_url);

    let payload = source.fetch_json(&endpoints.menu_url).await;
    let Some(nav) = payload.as_ref().and_then(|value| value.as_array()) else {
        return Err(RippleError::MenuPayload {
            url: endpoints.menu_url.clone(),
        });
    };

    let rows = build_menu_rows(nav, &endpoints.products_label)?;
    tracing::info!("Flattened {} menu categories", rows.len());
    Ok(rows)
}
