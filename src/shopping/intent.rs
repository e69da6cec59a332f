use crate::models::{Category, ShoppingItem, SortOption};

/// User actions and store events handled by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ShoppingIntent {
    /// The store published a new full snapshot.
    ItemsLoaded(Vec<ShoppingItem>),
    ItemNameChanged(String),
    CategoryChanged(Category),
    ToggleCategoryFilter(Category),
    /// The "All" entry of the filter menu.
    ClearCategoryFilters,
    SortOptionChanged(SortOption),
    EditItem(ShoppingItem),
    /// `false` cancels the form and drops the draft.
    ShowForm(bool),
    SaveItem,
    /// Write an item as-is, e.g. after toggling its completed checkbox.
    UpdateItem(ShoppingItem),
    DeleteItem(ShoppingItem),
}

/// Persistence request produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert(ShoppingItem),
    Update(ShoppingItem),
    Delete(ShoppingItem),
}
