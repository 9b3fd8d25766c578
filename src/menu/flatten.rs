//! Category tree flattening
//!
//! The navigation document is an array of top-level entries. One of them
//! (titled with the products label) holds the product category tree in its
//! `childMenu`; every node of that tree becomes one [`CategoryRow`].

use crate::catalog::Scalar;
use crate::{Result, RippleError};
use serde_json::{Map, Value};

/// Read-only view of one menu node in the raw navigation payload
#[derive(Debug, Clone, Copy)]
pub struct MenuNode<'a>(&'a Map<String, Value>);

impl<'a> MenuNode<'a> {
    pub fn new(object: &'a Map<String, Value>) -> Self {
        Self(object)
    }

    /// Unique id coerced to text and trimmed; empty becomes `None`
    pub fn unique_id(&self) -> Option<String> {
        let id = Scalar::field(self.0, "uniqueID")?.to_string();
        let trimmed = id.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Title used on top-level navigation entries
    pub fn nav_title(&self) -> Option<&'a str> {
        self.0.get("navTitle").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<String> {
        self.text("jcr:title")
    }

    pub fn seo_url(&self) -> Option<String> {
        self.text("seo_url")
    }

    pub fn internal_url(&self) -> Option<String> {
        self.text("aem_url")
    }

    /// The `childMenu` array, when present and actually an array
    pub fn children(&self) -> Option<&'a Vec<Value>> {
        self.0.get("childMenu").and_then(Value::as_array)
    }

    fn text(&self, key: &str) -> Option<String> {
        Scalar::field(self.0, key).map(|value| value.to_string())
    }
}

/// One flattened menu node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    /// Depth below the products root; the root's children are level 1
    pub level: u32,
    pub unique_id: Option<String>,
    pub parent_unique_id: Option<String>,
    pub title: Option<String>,
    pub seo_url: Option<String>,
    pub internal_url: Option<String>,
}

/// Locates the product category list among the top-level menu entries
///
/// Prefers the entry titled `products_label`, falling back to the first entry
/// with a non-empty child list.
pub fn find_products_root<'a>(nav: &'a [Value], products_label: &str) -> Result<&'a [Value]> {
    let entries = || nav.iter().filter_map(Value::as_object).map(MenuNode::new);

    if let Some(children) = entries()
        .filter(|entry| entry.nav_title() == Some(products_label))
        .find_map(|entry| entry.children())
    {
        return Ok(children.as_slice());
    }

    if let Some(children) = entries()
        .filter_map(|entry| entry.children())
        .find(|children| !children.is_empty())
    {
        tracing::warn!(
            "No menu entry titled '{}', using first entry with children",
            products_label
        );
        return Ok(children.as_slice());
    }

    Err(RippleError::MenuRootNotFound)
}

/// Flattens `menu` depth-first in pre-order, appending one row per node
pub fn flatten_menu(
    menu: &[Value],
    level: u32,
    parent_unique_id: Option<&str>,
    rows: &mut Vec<CategoryRow>,
) {
    for node in menu.iter().filter_map(Value::as_object).map(MenuNode::new) {
        let unique_id = node.unique_id();

        rows.push(CategoryRow {
            level,
            unique_id: unique_id.clone(),
            parent_unique_id: parent_unique_id.map(str::to_string),
            title: node.title(),
            seo_url: node.seo_url(),
            internal_url: node.internal_url(),
        });

        if let Some(children) = node.children().filter(|c| !c.is_empty()) {
            flatten_menu(children, level + 1, unique_id.as_deref(), rows);
        }
    }
}

/// Builds the flat category table from a navigation payload
///
/// The payload must be a JSON array; anything else means the menu fetch failed.
pub fn build_menu_rows(nav: &[Value], products_label: &str) -> Result<Vec<CategoryRow>> {
    let root = find_products_root(nav, products_label)?;
    let mut rows = Vec::new();
    flatten_menu(root, 1, None, &mut rows);
    Ok(rows)
}
