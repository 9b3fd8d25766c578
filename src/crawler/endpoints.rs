//! Upstream endpoint URL construction

use crate::catalog::CategoryPath;
use crate::config::EndpointConfig;
use url::{ParseError, Url};

/// Fixed catalog search parameters that precede the paging parameters
const SEARCH_TYPE: &str = "1002";
const SEARCH_SOURCE: &str = "E";
const P_MODE: &str = "mixed";

/// Appends path segments to a base URL, dropping a trailing empty segment
fn join_segments<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Category detail document: `<model base>/<a>/<b>/<c>.model.json`
pub fn model_url(endpoints: &EndpointConfig, path: &CategoryPath) -> Result<Url, ParseError> {
    let segments = path.segments();
    let last = format!("{}.model.json", segments[segments.len() - 1]);
    let leading = segments[..segments.len() - 1].iter().map(String::as_str);

    join_segments(
        &endpoints.model_base_url,
        leading.chain(std::iter::once(last.as_str())),
    )
}

/// One page of the catalog search for a category key
pub fn catalog_url(
    endpoints: &EndpointConfig,
    category_key: &str,
    page: u32,
    page_size: u32,
) -> Result<Url, ParseError> {
    let mut url = join_segments(
        &endpoints.catalog_base_url,
        [
            "search",
            "store",
            endpoints.store_id.as_str(),
            "productview",
            "byCategory",
            category_key,
        ],
    )?;

    url.query_pairs_mut()
        .append_pair("searchType", SEARCH_TYPE)
        .append_pair("searchSource", SEARCH_SOURCE)
        .append_pair("pageNumber", &page.to_string())
        .append_pair("pageSize", &page_size.to_string())
        .append_pair("responseFormat", "json")
        .append_pair("catalogId", &endpoints.catalog_id)
        .append_pair("p_mode", P_MODE)
        .append_pair("currency", &endpoints.currency)
        .append_pair("langId", &endpoints.lang_id)
        .append_pair("orderBy", &endpoints.order_by);

    Ok(url)
}
