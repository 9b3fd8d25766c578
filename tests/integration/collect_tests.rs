//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the menu, category model and
//! catalog search endpoints and run the menu and product stages end-to-end.

use catalog_ripple::config::{CollectionConfig, Config, EndpointConfig, HttpConfig, OutputConfig};
use catalog_ripple::crawler::{collect_products, harvest_menu, HttpFetcher, JsonSource, RetryPolicy};
use catalog_ripple::output::{load_categories, save_menu_workbook, ProductOutput};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG_PATH: &str = "/api/ext/search/store/10151/productview/byCategory";

/// Fetcher with no backoff so retry tests run instantly
fn fast_fetcher(retries: u32) -> HttpFetcher {
    HttpFetcher::with_client(
        reqwest::Client::new(),
        RetryPolicy {
            retries,
            backoff_factor: 0.0,
        },
    )
}

/// Creates a test configuration pointing every endpoint at the mock server
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        http: HttpConfig {
            timeout_secs: 5,
            retries: 1,
            backoff_factor: 0.0,
            ..HttpConfig::default()
        },
        endpoints: EndpointConfig {
            menu_url: format!("{}/nav/home.navMenu.json", base_url),
            model_base_url: format!("{}/products", base_url),
            catalog_base_url: format!("{}/api/ext", base_url),
            ..EndpointConfig::default()
        },
        collection: CollectionConfig {
            delay_seconds: 0.0,
            save_interval: 0,
            ..CollectionConfig::default()
        },
        output: OutputConfig {
            menu_file: dir.path().join("output/menu_structure.xlsx"),
            products_file: dir.path().join("output/products.csv"),
            summary_markdown: Some(dir.path().join("output/summary.md")),
        },
    }
}

fn nav_payload() -> Value {
    json!([
        {"navTitle": "Offers", "childMenu": [{"uniqueID": "900", "jcr:title": "Deals"}]},
        {"navTitle": "Προϊόντα", "childMenu": [
            {"uniqueID": "1", "jcr:title": "Image", "aem_url": "/content/gr/products/image", "childMenu": [
                {"uniqueID": "10", "jcr:title": "TV", "aem_url": "/content/gr/products/image/tv", "childMenu": [
                    {"uniqueID": 100, "jcr:title": "OLED", "seo_url": "/tv/oled",
                     "aem_url": "/content/gr/products/image/tv/oled"},
                    {"uniqueID": "101", "jcr:title": "QLED",
                     "aem_url": "/content/gr/products/image/tv/qled"}
                ]}
            ]}
        ]}
    ])
}

fn product(unique_id: &str, brand: &str) -> Value {
    json!({
        "uniqueID": unique_id,
        "partNumber": format!("P-{}", unique_id),
        "name": format!("Television {}", unique_id),
        "manufacturer": brand,
        "buyable": "true",
        "price": [
            {"usage": "Display", "value": "599.0"},
            {"usage": "Offer", "value": "499.0"}
        ],
        "attributes": [{"values": [{"value": "Black Friday 2024"}]}],
        "UserData": [{"seo_url": format!("/p/{}", unique_id)}]
    })
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, key: &str, page: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}/{}", CATALOG_PATH, key)))
        .and(query_param("pageNumber", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_retries_transient_status_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fast_fetcher(2);
    let value = fetcher
        .fetch_json(&format!("{}/flaky", mock_server.uri()))
        .await;

    assert_eq!(value, Some(json!({"ok": true})));
}

#[tokio::test]
async fn test_gives_up_after_retry_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = fast_fetcher(2);
    let value = fetcher.fetch_json(&format!("{}/down", mock_server.uri())).await;

    assert_eq!(value, None);
}

#[tokio::test]
async fn test_retry_after_header_is_honored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&mock_server)
        .await;

    let fetcher = fast_fetcher(1);
    let value = fetcher
        .fetch_json(&format!("{}/limited", mock_server.uri()))
        .await;

    assert_eq!(value, Some(json!([1, 2])));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fast_fetcher(3);
    let value = fetcher
        .fetch_json(&format!("{}/missing", mock_server.uri()))
        .await;

    assert_eq!(value, None);
}

#[tokio::test]
async fn test_invalid_json_is_a_failed_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fast_fetcher(3);
    let value = fetcher.fetch_json(&format!("{}/html", mock_server.uri())).await;

    assert_eq!(value, None);
}

#[tokio::test]
async fn test_menu_then_products_end_to_end() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), &dir);
    config.collection.max_pages_per_category = Some(1);

    mount_json(&mock_server, "/nav/home.navMenu.json", nav_payload()).await;
    mount_json(
        &mock_server,
        "/products/image/tv/oled.model.json",
        json!({"categoryId": 5001, "title": "OLED TVs", "remoteSPAUrl": "/tv/oled"}),
    )
    .await;
    mount_page(
        &mock_server,
        "oled",
        "1",
        json!({"catalogEntryView": [product("1", "LG"), product("2", "Sony"), product("3", "LG")]}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/oled", CATALOG_PATH)))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"catalogEntryView": []})))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "qled", "1", json!({"catalogEntryView": []})).await;

    let fetcher = HttpFetcher::new(&config.http).unwrap();

    // Menu stage
    let rows = harvest_menu(&fetcher, &config.endpoints).await.unwrap();
    assert_eq!(rows.len(), 4);
    save_menu_workbook(&rows, &config.output.menu_file).unwrap();

    // Products stage
    let categories = load_categories(&config.output.menu_file, 3, None).unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].unique_id.as_deref(), Some("100"));

    let output = ProductOutput::new(
        &config.output.products_file,
        config.output.summary_markdown.clone(),
    );
    let report = collect_products(&fetcher, &config, &categories, &output)
        .await
        .unwrap();

    assert_eq!(report.records_collected, 3);
    assert!(report.failed_categories.is_empty());
    assert_eq!(report.outcomes.limit_reached, 1);
    assert_eq!(report.outcomes.exhausted, 1);

    let products = std::fs::read_to_string(&config.output.products_file).unwrap();
    let mut lines = products.lines();
    assert!(lines
        .next()
        .unwrap()
        .starts_with("Category_Source_UniqueID,Category_Source_Title,Category_AEM_URL,Category_ID_number"));
    let first = lines.next().unwrap();
    assert!(first.starts_with("100,OLED,/content/gr/products/image/tv/oled,5001,OLED TVs,/tv/oled,1,N/A,P-1,"));
    assert!(first.ends_with(",LG,true,True,/p/1,599.0,499.0"));

    let brands =
        std::fs::read_to_string(dir.path().join("output/products_brand_summary.csv")).unwrap();
    assert_eq!(brands, "manufacturer,Products\nLG,2\nSony,1\n");

    let summary = std::fs::read_to_string(dir.path().join("output/summary.md")).unwrap();
    assert!(summary.contains("- Categories processed: 2\n"));
    assert!(summary.contains("- Products captured: 3\n"));
    assert!(summary.contains("| OLED TVs | 3 |"));
}

#[tokio::test]
async fn test_max_products_stops_collection() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), &dir);
    config.collection.max_products = Some(1);
    config.output.summary_markdown = None;

    Mock::given(method("GET"))
        .and(path(format!("{}/oled", CATALOG_PATH)))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "catalogEntryView": (1..=5).map(|i| product(&i.to_string(), "LG")).collect::<Vec<_>>()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/qled", CATALOG_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"catalogEntryView": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_json(&mock_server, "/nav/home.navMenu.json", nav_payload()).await;
    let fetcher = HttpFetcher::new(&config.http).unwrap();
    let rows = harvest_menu(&fetcher, &config.endpoints).await.unwrap();
    save_menu_workbook(&rows, &config.output.menu_file).unwrap();
    let categories = load_categories(&config.output.menu_file, 3, None).unwrap();

    let output = ProductOutput::new(&config.output.products_file, None);
    let report = collect_products(&fetcher, &config, &categories, &output)
        .await
        .unwrap();

    assert_eq!(report.records_collected, 1);
    assert_eq!(report.output.rows, 1);
    assert!(!dir.path().join("output/summary.md").exists());
}

#[tokio::test]
async fn test_failed_category_is_recorded_and_run_continues() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    mount_json(&mock_server, "/nav/home.navMenu.json", nav_payload()).await;
    Mock::given(method("GET"))
        .and(path(format!("{}/oled", CATALOG_PATH)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "qled", "1", json!({"catalogEntryView": [product("7", "TCL")]})).await;
    mount_page(&mock_server, "qled", "2", json!({"recordSetCount": 1})).await;

    let fetcher = HttpFetcher::new(&config.http).unwrap();
    let rows = harvest_menu(&fetcher, &config.endpoints).await.unwrap();
    save_menu_workbook(&rows, &config.output.menu_file).unwrap();
    let categories = load_categories(&config.output.menu_file, 3, None).unwrap();

    let output = ProductOutput::new(
        &config.output.products_file,
        config.output.summary_markdown.clone(),
    );
    let report = collect_products(&fetcher, &config, &categories, &output)
        .await
        .unwrap();

    assert_eq!(report.failed_categories, vec!["OLED"]);
    assert_eq!(report.records_collected, 1);

    let summary = std::fs::read_to_string(dir.path().join("output/summary.md")).unwrap();
    assert!(summary.contains("- Failed categories: 1\n- Failed list: OLED\n"));
}

#[tokio::test]
async fn test_menu_payload_must_be_a_list() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    mount_json(&mock_server, "/nav/home.navMenu.json", json!({"error": "nope"})).await;

    let fetcher = HttpFetcher::new(&config.http).unwrap();
    let result = harvest_menu(&fetcher, &config.endpoints).await;

    assert!(matches!(
        result,
        Err(catalog_ripple::RippleError::MenuPayload { .. })
    ));
}
