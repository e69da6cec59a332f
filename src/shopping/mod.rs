//! Grocery list screen state.
//!
//! ```text
//! store snapshot ──→ ItemsLoaded ──┐
//!                                  ├──→ ShoppingReducer ──→ ShoppingUiState ──→ view
//! view actions ──→ ShoppingIntent ─┘            │
//!                                               └──→ Command ──→ repository ──→ store
//! ```

mod intent;
mod reducer;
mod repository;
mod state;
mod subscription;
mod view_model;

pub use intent::{Command, ShoppingIntent};
pub use reducer::{process_items, ShoppingReducer};
pub use repository::ShoppingRepository;
pub use state::ShoppingUiState;
pub use subscription::Subscription;
pub use view_model::ShoppingViewModel;
