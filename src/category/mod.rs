//! The shared and per-user catalog of transaction categories.

mod core;
mod create_endpoint;
mod list_endpoint;
mod transactions_endpoint;

pub use core::{
    Category, CategoryId, CategoryName, PREDEFINED_CATEGORIES, create_category_table,
    create_custom_category, get_transactions_by_category, get_visible_categories,
    get_visible_category, seed_categories,
};
pub use create_endpoint::{NewCategory, create_category_endpoint};
pub use list_endpoint::list_categories_endpoint;
pub use transactions_endpoint::list_category_transactions_endpoint;
