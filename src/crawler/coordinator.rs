//! Collection coordinator - the per-category, per-page product loop
//!
//! This module drives product collection over the selected categories:
//! - Resolving category metadata from the model document
//! - Paging through the catalog search until a limit or the end of results
//! - Writing periodic progress checkpoints
//! - Writing the final output and digest

use crate::catalog::{parse_product_entry, resolve_category_metadata, CategoryInfo, CategoryPath};
use crate::config::{CollectionConfig, EndpointConfig};
use crate::crawler::endpoints::catalog_url;
use crate::crawler::JsonSource;
use crate::menu::CategoryRef;
use crate::output::{ProductOutput, SaveReport};
use crate::state::{advance, CategoryPhase, OutcomeCounts, RunState};
use crate::Result;
use serde_json::Value;
use std::time::Duration;

/// Key of the product list in a catalog search page
const ENTRIES_KEY: &str = "catalogEntryView";

/// What a finished collection run produced
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub total_categories: usize,
    /// Records collected before deduplication
    pub records_collected: usize,
    pub failed_categories: Vec<String>,
    pub outcomes: OutcomeCounts,
    pub pages_requested: usize,
    pub output: SaveReport,
}

/// Sequential product collector over one [`JsonSource`]
pub struct Collector<'a, S: JsonSource> {
    source: &'a S,
    endpoints: &'a EndpointConfig,
    collection: &'a CollectionConfig,
    output: &'a ProductOutput,
    state: RunState,
}

impl<'a, S: JsonSource> Collector<'a, S> {
    pub fn new(
        source: &'a S,
        endpoints: &'a EndpointConfig,
        collection: &'a CollectionConfig,
        output: &'a ProductOutput,
    ) -> Self {
        Self {
            source,
            endpoints,
            collection,
            output,
            state: RunState::new(),
        }
    }

    /// Collects products for every category in order, then writes the output
    ///
    /// Per-category failures are recorded and never abort the run. The final
    /// write always happens, even with zero records, and its failure is fatal.
    pub async fn run(mut self, categories: &[CategoryRef]) -> Result<CollectionReport> {
        let total = categories.len();
        let start_time = std::time::Instant::now();

        for (index, category) in categories.iter().enumerate() {
            if self.state.product_cap_reached(self.collection.max_products) {
                tracing::info!(
                    "Product limit reached, skipping remaining {} categories",
                    total - index
                );
                break;
            }

            tracing::info!("Category {}/{}: {}", index + 1, total, category.display_title());
            let phase = self.collect_category(category).await?;
            tracing::debug!("Category {} finished: {}", category.display_title(), phase);
            self.state.finish_category(phase);
        }

        let output = self.output.save(
            self.state.records(),
            total,
            self.state.failed_categories(),
        )?;

        let outcomes = self.state.outcome_counts();
        tracing::info!(
            "Outcomes: {} exhausted, {} limited, {} failed, {} skipped ({} pages in {:?})",
            outcomes.exhausted,
            outcomes.limit_reached,
            outcomes.failed,
            outcomes.skipped,
            self.state.pages_requested(),
            start_time.elapsed()
        );
        tracing::info!(
            "Done. Categories: {} | Products: {} | Failed categories: {}",
            total,
            self.state.record_count(),
            self.state.failed_categories().len()
        );

        Ok(CollectionReport {
            total_categories: total,
            records_collected: self.state.record_count(),
            failed_categories: self.state.failed_categories().to_vec(),
            outcomes,
            pages_requested: self.state.pages_requested(),
            output,
        })
    }

    /// Runs one category to a terminal phase
    async fn collect_category(&mut self, category: &CategoryRef) -> Result<CategoryPhase> {
        let title = category.display_title();
        let mut phase = CategoryPhase::Pending;

        let path = match CategoryPath::parse(&category.aem_url) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping category with invalid AEM_URL: {}", e);
                self.state.mark_failed(title);
                advance(&mut phase, CategoryPhase::Skipped)?;
                return Ok(phase);
            }
        };

        advance(&mut phase, CategoryPhase::ResolvingMetadata)?;
        let metadata = resolve_category_metadata(self.source, self.endpoints, &path).await;
        let info = CategoryInfo::new(category, metadata);

        let mut page: u32 = 1;
        let mut saw_data = false;

        loop {
            if self.page_limit_reached(page)
                || self.state.product_cap_reached(self.collection.max_products)
            {
                advance(&mut phase, CategoryPhase::LimitReached)?;
                break;
            }

            advance(&mut phase, CategoryPhase::FetchingPage(page))?;
            let payload = self.fetch_page(path.category_key(), page).await;

            let Some(object) = payload.as_ref().and_then(Value::as_object) else {
                tracing::warn!("No catalog page {} for category {}", page, title);
                self.state.mark_failed(title);
                advance(&mut phase, CategoryPhase::Failed)?;
                break;
            };

            let entries = match object.get(ENTRIES_KEY).and_then(Value::as_array) {
                Some(entries) if !entries.is_empty() => entries,
                _ => {
                    advance(&mut phase, CategoryPhase::Exhausted)?;
                    break;
                }
            };

            saw_data = true;
            for entry in entries.iter().filter_map(Value::as_object) {
                self.state.push_record(parse_product_entry(entry, &info));
                if self.state.product_cap_reached(self.collection.max_products) {
                    break;
                }
            }

            self.checkpoint();
            page += 1;
        }

        if !saw_data {
            tracing::info!("No products returned for category: {}", title);
        }

        Ok(phase)
    }

    fn page_limit_reached(&self, page: u32) -> bool {
        self.collection
            .max_pages_per_category
            .is_some_and(|max| page > max)
    }

    /// Fetches one catalog page, pausing first unless it is the run's first request
    async fn fetch_page(&mut self, category_key: &str, page: u32) -> Option<Value> {
        let url = match catalog_url(self.endpoints, category_key, page, self.collection.page_size) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build catalog URL for {}: {}", category_key, e);
                return None;
            }
        };

        if self.state.pages_requested() > 0 && self.collection.delay_seconds > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(self.collection.delay_seconds)).await;
        }
        self.state.note_page_request();

        tracing::debug!("Fetching {}", url);
        self.source.fetch_json(url.as_str()).await
    }

    /// Writes the progress file when the record count hits the save interval
    fn checkpoint(&self) {
        let interval = self.collection.save_interval;
        let count = self.state.record_count();
        if interval == 0 || count == 0 || count % interval != 0 {
            return;
        }

        match self.output.save_progress(self.state.records()) {
            Ok(report) => tracing::info!("Checkpoint: {} rows in {}", report.rows, report.path.display()),
            Err(e) => tracing::warn!("Failed to write progress file: {}", e),
        }
    }
}

/// Collects products for `categories` and writes the output
///
/// # Example
///
/// ```no_run
/// use catalog_ripple::config::Config;
/// use catalog_ripple::crawler::{collect_products, HttpFetcher};
/// use catalog_ripple::output::{load_categories, ProductOutput};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let fetcher = HttpFetcher::new(&config.http)?;
/// let categories = load_categories(&config.output.menu_file, 3, None)?;
/// let output = ProductOutput::new(&config.output.products_file, None);
/// collect_products(&fetcher, &config, &categories, &output).await?;
/// # Ok(())
/// # }
/// ```
pub async fn collect_products<S: JsonSource>(
    source: &S,
    config: &crate::config::Config,
    categories: &[CategoryRef],
    output: &ProductOutput,
) -> Result<CollectionReport> {
    Collector::new(source, &config.endpoints, &config.collection, output)
        .run(categories)
        .await
}
