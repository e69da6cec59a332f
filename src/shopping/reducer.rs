use std::collections::BTreeSet;

use super::intent::{Command, ShoppingIntent};
use super::state::ShoppingUiState;
use crate::models::{Category, ShoppingItem, SortOption};

pub struct ShoppingReducer;

impl ShoppingReducer {
    /// Apply one intent. Pure: persistence is returned as a [`Command`]
    /// for the caller to run.
    pub fn reduce(
        state: ShoppingUiState,
        intent: ShoppingIntent,
    ) -> (ShoppingUiState, Option<Command>) {
        match intent {
            ShoppingIntent::ItemsLoaded(items) => {
                (reproject(ShoppingUiState { items, ..state }), None)
            }
            ShoppingIntent::ItemNameChanged(item_name) => {
                (ShoppingUiState { item_name, ..state }, None)
            }
            ShoppingIntent::CategoryChanged(item_category) => (
                ShoppingUiState {
                    item_category,
                    ..state
                },
                None,
            ),
            ShoppingIntent::ToggleCategoryFilter(category) => {
                let mut selected_categories = state.selected_categories.clone();
                if !selected_categories.remove(&category) {
                    selected_categories.insert(category);
                }
                (
                    reproject(ShoppingUiState {
                        selected_categories,
                        ..state
                    }),
                    None,
                )
            }
            ShoppingIntent::ClearCategoryFilters => (
                reproject(ShoppingUiState {
                    selected_categories: BTreeSet::new(),
                    ..state
                }),
                None,
            ),
            ShoppingIntent::SortOptionChanged(sort_option) => (
                reproject(ShoppingUiState {
                    sort_option,
                    ..state
                }),
                None,
            ),
            ShoppingIntent::EditItem(item) => (
                ShoppingUiState {
                    item_name: item.name.clone(),
                    item_category: item.category,
                    item_to_edit: Some(item),
                    show_form: true,
                    ..state
                },
                None,
            ),
            ShoppingIntent::ShowForm(true) => (
                ShoppingUiState {
                    show_form: true,
                    ..state
                },
                None,
            ),
            ShoppingIntent::ShowForm(false) => (state.clear_draft(), None),
            ShoppingIntent::SaveItem => save(state),
            ShoppingIntent::UpdateItem(item) => (state, Some(Command::Update(item))),
            ShoppingIntent::DeleteItem(item) => (state, Some(Command::Delete(item))),
        }
    }
}

fn save(state: ShoppingUiState) -> (ShoppingUiState, Option<Command>) {
    // Only a literally empty name is rejected, and silently.
    if state.item_name.is_empty() {
        return (state, None);
    }

    let command = match &state.item_to_edit {
        Some(target) => Command::Update(ShoppingItem {
            name: state.item_name.clone(),
            category: state.item_category,
            ..target.clone()
        }),
        None => Command::Insert(ShoppingItem::new(
            state.item_name.clone(),
            state.item_category,
        )),
    };

    (state.clear_draft(), Some(command))
}

fn reproject(state: ShoppingUiState) -> ShoppingUiState {
    let filtered_items = process_items(
        &state.items,
        &state.selected_categories,
        state.sort_option,
    );
    ShoppingUiState {
        filtered_items,
        ..state
    }
}

/// Filter by the selected categories (none selected keeps everything),
/// then stable-sort by the active option.
pub fn process_items(
    items: &[ShoppingItem],
    selected_categories: &BTreeSet<Category>,
    sort_option: SortOption,
) -> Vec<ShoppingItem> {
    let mut visible: Vec<ShoppingItem> = items
        .iter()
        .filter(|item| {
            selected_categories.is_empty() || selected_categories.contains(&item.category)
        })
        .cloned()
        .collect();

    match sort_option {
        SortOption::Alphabetical => visible.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOption::ByCategory => {
            visible.sort_by(|a, b| a.category.name().cmp(b.category.name()))
        }
        SortOption::ByStatus => visible.sort_by_key(|item| item.is_completed),
    }

    visible
}
