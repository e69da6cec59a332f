mod category;
mod item;
mod sort_option;

pub use category::{Category, CategoryParseError};
pub use item::ShoppingItem;
pub use sort_option::SortOption;
