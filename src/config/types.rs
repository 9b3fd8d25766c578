use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Main configuration structure for Catalog-Ripple
///
/// Every section is optional in the TOML file; missing keys take the defaults
/// the command line would use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub endpoints: EndpointConfig,
    pub collection: CollectionConfig,
    pub output: OutputConfig,
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Retry attempts for transient failures (429/5xx, timeouts)
    pub retries: u32,

    /// Exponential backoff base factor in seconds
    #[serde(rename = "backoff-factor")]
    pub backoff_factor: f64,

    /// Static user agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            retries: 3,
            backoff_factor: 0.8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Upstream endpoint locations and fixed catalog query constants
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Navigation menu document
    #[serde(rename = "menu-url")]
    pub menu_url: String,

    /// Base under which `<a>/<b>/<c>.model.json` category documents live
    #[serde(rename = "model-base-url")]
    pub model_base_url: String,

    /// Base of the catalog search API
    #[serde(rename = "catalog-base-url")]
    pub catalog_base_url: String,

    #[serde(rename = "store-id")]
    pub store_id: String,

    #[serde(rename = "catalog-id")]
    pub catalog_id: String,

    #[serde(rename = "lang-id")]
    pub lang_id: String,

    pub currency: String,

    #[serde(rename = "order-by")]
    pub order_by: String,

    /// Title of the top-level menu entry holding the product tree
    #[serde(rename = "products-label")]
    pub products_label: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            menu_url: "https://new-content.kotsovolos.gr/content/kotsovolos/b2c/gr/home.navMenu.json"
                .to_string(),
            model_base_url: "https://new-content.kotsovolos.gr/content/kotsovolos/b2c/gr/products"
                .to_string(),
            catalog_base_url: "https://www.kotsovolos.gr/api/ext".to_string(),
            store_id: "10151".to_string(),
            catalog_id: "10551".to_string(),
            lang_id: "-24".to_string(),
            currency: "EUR".to_string(),
            order_by: "10".to_string(),
            products_label: "Προϊόντα".to_string(),
        }
    }
}

/// Product collection limits and pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Menu level whose categories drive product collection
    pub level: u32,

    #[serde(rename = "max-categories")]
    pub max_categories: Option<usize>,

    #[serde(rename = "max-products")]
    pub max_products: Option<usize>,

    #[serde(rename = "max-pages-per-category")]
    pub max_pages_per_category: Option<u32>,

    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Delay between catalog page requests, in seconds
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Write a progress file every N collected products (0 disables)
    #[serde(rename = "save-interval")]
    pub save_interval: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            level: 3,
            max_categories: None,
            max_products: None,
            max_pages_per_category: None,
            page_size: 15,
            delay_seconds: 0.2,
            save_interval: 500,
        }
    }
}

impl CollectionConfig {
    /// Zero-valued limits mean "unlimited"
    pub fn normalize_limits(&mut self) {
        self.max_categories = self.max_categories.filter(|n| *n > 0);
        self.max_products = self.max_products.filter(|n| *n > 0);
        self.max_pages_per_category = self.max_pages_per_category.filter(|n| *n > 0);
    }
}

/// Output file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Leveled menu workbook, written by menu mode and read by products mode
    #[serde(rename = "menu-file")]
    pub menu_file: PathBuf,

    /// Product output (`.xlsx` or `.csv`)
    #[serde(rename = "products-file")]
    pub products_file: PathBuf,

    /// Markdown digest; `None` disables it
    #[serde(rename = "summary-markdown")]
    pub summary_markdown: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            menu_file: PathBuf::from("output/menu_structure.xlsx"),
            products_file: PathBuf::from("output/kotsovolos_products.xlsx"),
            summary_markdown: Some(PathBuf::from("output/kotsovolos_summary.md")),
        }
    }
}

/// Interprets a summary path argument, where `none`, `null` or blank disable it
pub fn parse_summary_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    match trimmed.to_lowercase().as_str() {
        "" | "none" | "null" => None,
        _ => Some(PathBuf::from(trimmed)),
    }
}
