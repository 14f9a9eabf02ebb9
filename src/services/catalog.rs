use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::api::{PageRequest, PageResult};
use crate::database::{bounded, Item, ItemStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read path and mutation surface over the item collection. Every store call
/// is bounded by `timeout`; nothing is retried.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn ItemStore>,
    timeout: Duration,
}

impl Catalog {
    pub fn new(store: Arc<dyn ItemStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Fetch one page window and, independently, the total item count.
    ///
    /// The two reads are not isolated from each other, so under concurrent
    /// writes `meta.count` and `result` may describe different states.
    pub async fn list(&self, request: PageRequest) -> Result<PageResult<Item>, CatalogError> {
        let page = bounded(
            "find",
            self.timeout,
            self.store.find(request.offset(), request.limit()),
        );
        let count = bounded("count", self.timeout, self.store.count());

        let (items, count) = futures::try_join!(page, count)?;
        debug!(
            offset = request.offset(),
            limit = request.limit(),
            returned = items.len(),
            count,
            "listed items"
        );

        Ok(PageResult::new(request, count, items))
    }

    pub async fn get_one(&self, id: &str) -> Result<Item, CatalogError> {
        match bounded("find_one", self.timeout, self.store.find_one(id)).await {
            Ok(item) => Ok(item),
            Err(StoreError::NotFound(_)) => Err(CatalogError::NotFound(format!("Item {} not found", id))),
            Err(other) => Err(other.into()),
        }
    }

    /// Store `item` under a fresh identifier and return it. Any client-supplied
    /// identifier is discarded.
    pub async fn create(&self, item: Item) -> Result<String, CatalogError> {
        let id = Uuid::new_v4().simple().to_string();
        let stored = item.fields().with_id(id.clone());

        bounded("insert_one", self.timeout, self.store.insert_one(&stored)).await?;
        Ok(id)
    }

    /// Replace every field but the identifier. An unknown identifier matches
    /// nothing and still succeeds.
    pub async fn update(&self, item: Item) -> Result<(), CatalogError> {
        let id = item
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CatalogError::InvalidArgument("Missing _id".to_string()))?;

        let matched = bounded("update_one", self.timeout, self.store.update_one(id, &item.fields())).await?;
        if matched == 0 {
            debug!(item_id = %id, "update matched no item");
        }
        Ok(())
    }

    /// Deleting an unknown identifier also succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let deleted = bounded("delete_one", self.timeout, self.store.delete_one(id)).await?;
        if deleted == 0 {
            debug!(item_id = %id, "delete matched no item");
        }
        Ok(())
    }

    /// Round-trip to the store, used by the health endpoint.
    pub async fn ping(&self) -> Result<(), CatalogError> {
        bounded("count", self.timeout, self.store.count()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ItemFields, MemoryItemStore};
    use async_trait::async_trait;

    fn fields(n: usize) -> ItemFields {
        ItemFields {
            title: format!("Item {}", n),
            text: "body".into(),
            brand: "Minna".into(),
            images: vec![format!("img-{}.png", n)],
            button_link: format!("https://shop.example/{}", n),
        }
    }

    fn seeded(n: usize) -> Catalog {
        let items = (0..n).map(|i| fields(i).with_id(format!("id-{}", i))).collect();
        Catalog::new(Arc::new(MemoryItemStore::with_items(items)), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn pages_over_twenty_five_items() {
        let catalog = seeded(25);

        let first = catalog.list(PageRequest::new(1, 10).unwrap()).await.unwrap();
        assert_eq!(first.result.len(), 10);
        assert_eq!(first.meta.count, 25);
        assert_eq!(first.meta.offset, 0);

        let third = catalog.list(PageRequest::new(3, 10).unwrap()).await.unwrap();
        assert_eq!(third.result.len(), 5);
        assert_eq!(third.result[0].id.as_deref(), Some("id-20"));

        let fourth = catalog.list(PageRequest::new(4, 10).unwrap()).await.unwrap();
        assert!(fourth.result.is_empty());
        assert_eq!(fourth.meta.count, 25);
        assert_eq!(fourth.meta.offset, 30);
    }

    #[tokio::test]
    async fn create_assigns_fresh_id_and_round_trips() {
        let catalog = seeded(0);
        let submitted = fields(1).with_id("client-chosen");

        let id = catalog.create(submitted.clone()).await.unwrap();
        assert_ne!(id, "client-chosen");
        assert_eq!(id.len(), 32);

        let stored = catalog.get_one(&id).await.unwrap();
        assert_eq!(stored.fields(), submitted.fields());
        assert_eq!(stored.id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn get_one_missing_is_not_found() {
        let catalog = seeded(1);
        assert!(matches!(catalog.get_one("missing").await, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_of_unknown_id_succeeds() {
        let catalog = seeded(2);
        catalog.update(fields(9).with_id("nope")).await.unwrap();
        assert_eq!(catalog.list(PageRequest::default()).await.unwrap().meta.count, 2);
    }

    #[tokio::test]
    async fn update_requires_id() {
        let catalog = seeded(1);
        let mut item = fields(1).with_id("x");
        item.id = None;
        assert!(matches!(catalog.update(item).await, Err(CatalogError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn delete_removes_and_tolerates_unknown() {
        let catalog = seeded(3);
        catalog.delete("id-1").await.unwrap();
        catalog.delete("id-1").await.unwrap();
        let page = catalog.list(PageRequest::default()).await.unwrap();
        assert_eq!(page.meta.count, 2);
        assert!(page.result.iter().all(|i| i.id.as_deref() != Some("id-1")));
    }

    /// Fails every call. Listing fails on exactly one of its two reads.
    struct BrokenStore {
        fail_find: bool,
    }

    #[async_trait]
    impl ItemStore for BrokenStore {
        async fn find(&self, _skip: u64, _limit: u64) -> Result<Vec<Item>, StoreError> {
            if self.fail_find {
                return Err(StoreError::QueryError("cursor lost".into()));
            }
            Ok(vec![])
        }
        async fn count(&self) -> Result<u64, StoreError> {
            if self.fail_find {
                return Ok(3);
            }
            Err(StoreError::QueryError("connection reset".into()))
        }
        async fn insert_one(&self, _item: &Item) -> Result<(), StoreError> {
            Err(StoreError::QueryError("connection reset".into()))
        }
        async fn update_one(&self, _id: &str, _fields: &ItemFields) -> Result<u64, StoreError> {
            Err(StoreError::QueryError("connection reset".into()))
        }
        async fn delete_one(&self, _id: &str) -> Result<u64, StoreError> {
            Err(StoreError::QueryError("connection reset".into()))
        }
        async fn find_one(&self, _id: &str) -> Result<Item, StoreError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Err(StoreError::NotFound("late".into()))
        }
    }

    #[tokio::test]
    async fn count_failure_aborts_whole_listing() {
        let catalog = Catalog::new(Arc::new(BrokenStore { fail_find: false }), Duration::from_secs(1));
        let err = catalog.list(PageRequest::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::QueryError(m)) if m == "connection reset"));
    }

    #[tokio::test]
    async fn find_failure_aborts_whole_listing() {
        let catalog = Catalog::new(Arc::new(BrokenStore { fail_find: true }), Duration::from_secs(1));
        let err = catalog.list(PageRequest::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::QueryError(m)) if m == "cursor lost"));
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let catalog = Catalog::new(Arc::new(BrokenStore { fail_find: false }), Duration::from_millis(20));
        let err = catalog.get_one("any").await.unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::Timeout { .. })));
    }
}
