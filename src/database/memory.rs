use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{Item, ItemFields};
use super::store::{ItemStore, StoreError};

/// Insertion-ordered in-process collection.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: RwLock<Vec<Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn find(&self, skip: u64, limit: u64) -> Result<Vec<Item>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .skip(to_usize(skip))
            .take(to_usize(limit))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.items.read().await.len() as u64)
    }

    async fn insert_one(&self, item: &Item) -> Result<(), StoreError> {
        let id = item
            .id
            .as_deref()
            .ok_or_else(|| StoreError::QueryError("item has no _id".to_string()))?;

        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id.as_deref() == Some(id)) {
            return Err(StoreError::QueryError(format!("duplicate _id {}", id)));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn update_one(&self, id: &str, fields: &ItemFields) -> Result<u64, StoreError> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|item| item.id.as_deref() == Some(id)) {
            Some(item) => {
                *item = fields.clone().with_id(id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let mut items = self.items.write().await;
        match items.iter().position(|item| item.id.as_deref() == Some(id)) {
            Some(index) => {
                items.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_one(&self, id: &str) -> Result<Item, StoreError> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))
    }
}
