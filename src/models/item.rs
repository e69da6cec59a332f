use serde::{Deserialize, Serialize};
use std::fmt;

use super::Category;

/// A single entry on the grocery list.
///
/// `id` is assigned by the store. An id of `0` marks an item that has
/// not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub is_completed: bool,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            id: 0,
            name: name.into(),
            category,
            is_completed: false,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id != 0
    }

    /// Two saved items are the same entity when their ids match.
    #[cfg(test)]
    pub(crate) fn same_entity(&self, other: &ShoppingItem) -> bool {
        self.is_saved() && self.id == other.id
    }
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.is_completed { "[x]" } else { "[ ]" };
        write!(f, "{} {:>4}  {:<25} {}", check, self.id, self.name, self.category)
    }
}
