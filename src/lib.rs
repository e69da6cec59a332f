//! Shoplist
//!
//! A grocery list kept in SQLite, with category filters and sorting
//! driven by a small reducer.

pub mod config;
pub mod db;
pub mod models;
pub mod shopping;

pub use db::{init_db, ItemStore, StoreError};
pub use models::{Category, CategoryParseError, ShoppingItem, SortOption};
pub use shopping::{ShoppingIntent, ShoppingUiState, ShoppingViewModel};
