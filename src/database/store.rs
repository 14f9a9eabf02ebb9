use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Item, ItemFields};

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store operation '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The item collection. Implementations keep the collection's natural order;
/// no sort key is applied by `find`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Up to `limit` items starting at position `skip`.
    async fn find(&self, skip: u64, limit: u64) -> Result<Vec<Item>, StoreError>;

    /// Total number of items in the collection.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Insert an item that already carries its identifier.
    async fn insert_one(&self, item: &Item) -> Result<(), StoreError>;

    /// Replace the mutable fields of the item with `id`. Returns the number of
    /// matched items, which is zero for an unknown identifier.
    async fn update_one(&self, id: &str, fields: &ItemFields) -> Result<u64, StoreError>;

    /// Returns the number of deleted items.
    async fn delete_one(&self, id: &str) -> Result<u64, StoreError>;

    /// Fails with [`StoreError::NotFound`] when no item has `id`.
    async fn find_one(&self, id: &str) -> Result<Item, StoreError>;
}

/// Run one store call under a deadline. The call is abandoned when it elapses.
pub async fn bounded<T, F>(operation: &'static str, after: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout { operation, after }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_passes_through_results() {
        let ok = bounded("count", Duration::from_secs(1), async { Ok::<_, StoreError>(3u64) }).await;
        assert_eq!(ok.unwrap(), 3);

        let err = bounded("count", Duration::from_secs(1), async {
            Err::<u64, _>(StoreError::QueryError("boom".into()))
        })
        .await;
        assert!(matches!(err, Err(StoreError::QueryError(_))));
    }

    #[tokio::test]
    async fn bounded_reports_timeout() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, StoreError>(())
        };
        let err = bounded("find", Duration::from_millis(10), slow).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout { operation: "find", .. }));
    }
}
