use std::future::Future;
use tokio::sync::watch;

use crate::db::{ItemStore, StoreError};
use crate::models::ShoppingItem;

/// What the view model needs from persistence.
pub trait ShoppingRepository: Clone + Send + Sync + 'static {
    /// Current full item list, re-published on every change.
    fn items(&self) -> watch::Receiver<Vec<ShoppingItem>>;

    fn insert(&self, item: ShoppingItem) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update(&self, item: ShoppingItem) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, item: ShoppingItem) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl ShoppingRepository for ItemStore {
    fn items(&self) -> watch::Receiver<Vec<ShoppingItem>> {
        self.subscribe()
    }

    async fn insert(&self, item: ShoppingItem) -> Result<(), StoreError> {
        ItemStore::insert(self, &item).await.map(|_| ())
    }

    async fn update(&self, item: ShoppingItem) -> Result<(), StoreError> {
        ItemStore::update(self, &item).await
    }

    async fn delete(&self, item: ShoppingItem) -> Result<(), StoreError> {
        ItemStore::delete(self, &item).await
    }
}
