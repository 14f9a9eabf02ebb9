use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::models::{Item, ItemFields, ItemRow};
use super::store::{ItemStore, StoreError};

const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id          TEXT PRIMARY KEY,
        title       TEXT NOT NULL,
        text        TEXT NOT NULL,
        brand       TEXT NOT NULL,
        images      TEXT[] NOT NULL DEFAULT '{}',
        button_link TEXT NOT NULL
    )
"#;

/// Item collection backed by a Postgres `items` table.
#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        info!("Connected item store pool (max {} connections)", max_connections);
        Ok(Self::new(pool))
    }

    /// Connect and make sure the `items` table exists. Used by `serve`, so a
    /// fresh database is usable without a separate `migrate` run.
    pub async fn open(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let store = Self::connect(database_url, max_connections, acquire_timeout).await?;
        store.ensure_schema().await?;
        info!("items table is ready");
        Ok(store)
    }

    /// Create the `items` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ITEMS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

fn to_i64(n: u64, what: &str) -> Result<i64, StoreError> {
    i64::try_from(n).map_err(|_| StoreError::QueryError(format!("{} out of range: {}", what, n)))
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn find(&self, skip: u64, limit: u64) -> Result<Vec<Item>, StoreError> {
        // No ORDER BY: rows come back in the table's natural order.
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT id, title, text, brand, images, button_link FROM items OFFSET $1 LIMIT $2",
        )
        .bind(to_i64(skip, "offset")?)
        .bind(to_i64(limit, "limit")?)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(count).map_err(|_| StoreError::QueryError(format!("negative count {}", count)))
    }

    async fn insert_one(&self, item: &Item) -> Result<(), StoreError> {
        let id = item
            .id
            .as_deref()
            .ok_or_else(|| StoreError::QueryError("item has no _id".to_string()))?;

        sqlx::query(
            "INSERT INTO items (id, title, text, brand, images, button_link) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(&item.title)
        .bind(&item.text)
        .bind(&item.brand)
        .bind(&item.images)
        .bind(&item.button_link)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_one(&self, id: &str, fields: &ItemFields) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE items SET title = $2, text = $3, brand = $4, images = $5, button_link = $6 WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.text)
        .bind(&fields.brand)
        .bind(&fields.images)
        .bind(&fields.button_link)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_one(&self, id: &str) -> Result<Item, StoreError> {
        sqlx::query_as::<_, ItemRow>(
            "SELECT id, title, text, brand, images, button_link FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Item::from)
        .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_beyond_i64_are_rejected() {
        assert!(to_i64(u64::MAX, "offset").is_err());
        assert_eq!(to_i64(40, "offset").unwrap(), 40);
    }

    // Runs only when TEST_DATABASE_URL points at a disposable Postgres database.
    #[tokio::test]
    async fn open_prepares_a_fresh_database() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return;
        };

        let store = PgItemStore::connect(&url, 2, Duration::from_secs(5)).await.unwrap();
        sqlx::query("DROP TABLE IF EXISTS items").execute(&store.pool).await.unwrap();

        let store = PgItemStore::open(&url, 2, Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        // Idempotent on an existing table
        PgItemStore::open(&url, 2, Duration::from_secs(5)).await.unwrap();
    }
}
