//! In-process item store.
//!
//! Items live in an insertion-ordered `Vec` behind an async read-write lock.
//! Clones share the same data. Listings scan the whole collection.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::db::{ItemFilter, ItemStore, StoreResult};
use crate::models::{Item, ItemStatsResponse, UpdateItemRequest};

#[derive(Default, Clone, Debug)]
pub struct MemoryItemStore {
    items: Arc<RwLock<Vec<Item>>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, item: &Item) -> StoreResult<()> {
        self.items.write().await.push(item.clone());
        Ok(())
    }

    async fn find(&self, filter: &ItemFilter, skip: u64, limit: u64) -> StoreResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| filter.matches(item))
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ItemFilter) -> StoreResult<u64> {
        let items = self.items.read().await;
        Ok(items.iter().filter(|item| filter.matches(item)).count() as u64)
    }

    async fn find_one(&self, id: &str) -> StoreResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn update_one(&self, id: &str, changes: &UpdateItemRequest, updated_at: DateTime<Utc>) -> StoreResult<bool> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply_update(changes, updated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, id: &str) -> StoreResult<bool> {
        let mut items = self.items.write().await;
        match items.iter().position(|item| item.id == id) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn summarize(&self) -> StoreResult<ItemStatsResponse> {
        let items = self.items.read().await;
        Ok(ItemStatsResponse::from_items(items.iter()))
    }
}
