use std::collections::BTreeSet;

use crate::models::{Category, ShoppingItem, SortOption};

/// Everything the list screen needs to render.
///
/// A new snapshot replaces the previous one on every transition.
/// `filtered_items` is derived from `items`, `selected_categories` and
/// `sort_option` and is never edited on its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShoppingUiState {
    pub items: Vec<ShoppingItem>,
    pub filtered_items: Vec<ShoppingItem>,
    /// Empty means every category is shown.
    pub selected_categories: BTreeSet<Category>,
    /// `None` means the next save creates a new item.
    pub item_to_edit: Option<ShoppingItem>,
    pub item_name: String,
    pub item_category: Category,
    pub sort_option: SortOption,
    pub show_form: bool,
}

impl ShoppingUiState {
    pub fn is_editing(&self) -> bool {
        self.item_to_edit.is_some()
    }

    pub fn find_item(&self, id: i64) -> Option<&ShoppingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Drop the draft and close the form.
    pub(crate) fn clear_draft(self) -> Self {
        Self {
            item_to_edit: None,
            item_name: String::new(),
            item_category: Category::default(),
            show_form: false,
            ..self
        }
    }
}
