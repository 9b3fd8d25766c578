//! Category path parsing and metadata resolution

use crate::catalog::Scalar;
use crate::crawler::{endpoints, JsonSource};
use crate::config::EndpointConfig;
use crate::menu::CategoryRef;
use thiserror::Error;

/// Number of trailing internal-URL segments that address a category document
const PATH_SEGMENTS: usize = 3;

/// An internal URL with too few path segments to address a category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal URL '{0}' has fewer than 3 path segments")]
pub struct InvalidInternalUrl(pub String);

/// The trailing three segments of a category's internal URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    /// Splits an internal URL on `/`, keeping the last three non-empty segments
    pub fn parse(internal_url: &str) -> Result<Self, InvalidInternalUrl> {
        let parts: Vec<&str> = internal_url.split('/').filter(|p| !p.is_empty()).collect();
        if parts.len() < PATH_SEGMENTS {
            return Err(InvalidInternalUrl(internal_url.to_string()));
        }

        Ok(Self {
            segments: parts[parts.len() - PATH_SEGMENTS..]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, which the catalog search API uses as its category key
    pub fn category_key(&self) -> &str {
        &self.segments[PATH_SEGMENTS - 1]
    }
}

/// Splits an internal URL into its trailing three path segments
pub fn parse_internal_url_path(internal_url: &str) -> Result<Vec<String>, InvalidInternalUrl> {
    CategoryPath::parse(internal_url).map(|path| path.segments)
}

/// Canonical identifiers from a category detail document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMetadata {
    pub category_id: Option<Scalar>,
    pub title: Option<Scalar>,
    pub url: Option<Scalar>,
}

/// Category linkage carried by every product record
///
/// Combines the menu row that selected the category with whatever the detail
/// document resolved. It is built even when resolution failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryInfo {
    pub source_unique_id: Option<String>,
    pub source_title: Option<String>,
    pub aem_url: String,
    pub metadata: CategoryMetadata,
}

impl CategoryInfo {
    pub fn new(category: &CategoryRef, metadata: CategoryMetadata) -> Self {
        Self {
            source_unique_id: category.unique_id.clone(),
            source_title: category.title.clone(),
            aem_url: category.aem_url.clone(),
            metadata,
        }
    }
}

/// Fetches the detail document for `path` and extracts its identifiers
///
/// Each field falls back to absent independently. A failed fetch or a
/// non-object response yields all three absent; it is never an error.
pub async fn resolve_category_metadata<S: JsonSource>(
    source: &S,
    endpoints_config: &EndpointConfig,
    path: &CategoryPath,
) -> CategoryMetadata {
    let url = match endpoints::model_url(endpoints_config, path) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build model URL for {:?}: {}", path.segments(), e);
            return CategoryMetadata::default();
        }
    };

    let payload = source.fetch_json(url.as_str()).await;
    let Some(object) = payload.as_ref().and_then(|v| v.as_object()) else {
        tracing::debug!("No category metadata at {}", url);
        return CategoryMetadata::default();
    };

    CategoryMetadata {
        category_id: Scalar::field(object, "categoryId"),
        title: Scalar::field(object, "title"),
        url: Scalar::field(object, "remoteSPAUrl"),
    }
}
