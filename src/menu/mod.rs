//! Menu module: category tree flattening and category selection
//!
//! # Components
//!
//! - `flatten`: walks the navigation payload into leveled [`CategoryRow`]s
//! - `categories`: picks the [`CategoryRef`]s of one level from a persisted menu sheet

mod categories;
mod flatten;

pub use categories::{
    select_categories, CategoryRef, AEM_URL_COLUMN, LEVEL_COLUMN, TITLE_COLUMN, UNIQUE_ID_COLUMN,
};
pub use flatten::{build_menu_rows, find_products_root, flatten_menu, CategoryRow, MenuNode};
