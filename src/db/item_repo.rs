use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use super::StoreError;
use crate::models::{Category, CategoryParseError, ShoppingItem};

/// SQLite-backed item table with an observable snapshot of its contents.
///
/// Every successful write re-reads the whole table and publishes it to
/// subscribers. Writes and the following refresh share one lock, so a
/// subscriber never sees a snapshot older than one it already received.
#[derive(Clone)]
pub struct ItemStore {
    pool: SqlitePool,
    snapshot: Arc<watch::Sender<Vec<ShoppingItem>>>,
    write_lock: Arc<Mutex<()>>,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    category: String,
    is_completed: bool,
}

impl TryFrom<ItemRow> for ShoppingItem {
    type Error = CategoryParseError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(ShoppingItem {
            id: row.id,
            name: row.name,
            category: Category::from_name(&row.category)?,
            is_completed: row.is_completed,
        })
    }
}

impl ItemStore {
    /// Wrap a migrated pool and load the initial snapshot.
    pub async fn open(pool: SqlitePool) -> Result<Self, StoreError> {
        let items = fetch_all(&pool).await?;
        let (snapshot, _) = watch::channel(items);
        Ok(Self {
            pool,
            snapshot: Arc::new(snapshot),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Observe the full item list. The receiver starts at the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ShoppingItem>> {
        self.snapshot.subscribe()
    }

    pub async fn list(&self) -> Result<Vec<ShoppingItem>, StoreError> {
        fetch_all(&self.pool).await
    }

    #[cfg(test)]
    pub(crate) async fn get_by_id(&self, id: i64) -> Result<Option<ShoppingItem>, StoreError> {
        let row: Option<ItemRow> = sqlx::query_as(
            "SELECT id, name, category, is_completed FROM shopping_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ShoppingItem::try_from).transpose()?)
    }

    /// Insert an item. An unsaved item gets a fresh id; an existing id is replaced.
    pub async fn insert(&self, item: &ShoppingItem) -> Result<ShoppingItem, StoreError> {
        let _guard = self.write_lock.lock().await;

        let id = if item.is_saved() { Some(item.id) } else { None };
        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO shopping_items (id, name, category, is_completed)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(item.category.name())
        .bind(item.is_completed)
        .execute(&self.pool)
        .await?;

        let stored = item.clone().with_id(result.last_insert_rowid());
        tracing::debug!("Inserted item {} ({})", stored.id, stored.name);

        self.refresh().await?;
        Ok(stored)
    }

    pub async fn update(&self, item: &ShoppingItem) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query(
            r#"
            UPDATE shopping_items
            SET name = ?, category = ?, is_completed = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(item.category.name())
        .bind(item.is_completed)
        .bind(item.id)
        .execute(&self.pool)
        .await?;
        tracing::debug!(
            "Updated item {} ({} row(s))",
            item.id,
            result.rows_affected()
        );

        self.refresh().await
    }

    pub async fn delete(&self, item: &ShoppingItem) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        sqlx::query("DELETE FROM shopping_items WHERE id = ?")
            .bind(item.id)
            .execute(&self.pool)
            .await?;
        tracing::debug!("Deleted item {}", item.id);

        self.refresh().await
    }

    async fn refresh(&self) -> Result<(), StoreError> {
        let items = fetch_all(&self.pool).await?;
        self.snapshot.send_replace(items);
        Ok(())
    }
}

async fn fetch_all(pool: &SqlitePool) -> Result<Vec<ShoppingItem>, StoreError> {
    let rows: Vec<ItemRow> = sqlx::query_as(
        "SELECT id, name, category, is_completed FROM shopping_items ORDER BY category",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| ShoppingItem::try_from(row).map_err(StoreError::from))
        .collect()
}
