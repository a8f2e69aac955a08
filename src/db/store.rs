//! Persistence contract for items.
//!
//! Every call performs exactly one operation against the document store.
//! Items are addressed by their application-assigned `id`, never by the
//! store's native identifier.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Item, ItemStatsResponse, UpdateItemRequest};

#[derive(Error, Debug)]
pub enum StoreError {
    /// Error during client setup or connection string parsing.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// Converting between items and stored documents failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The underlying driver or server reported an error.
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filter applied to listings and counts. Both criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Case-insensitive substring of `name`
    pub search: Option<String>,
    /// Case-insensitive whole-value match on `category`
    pub category: Option<String>,
}

impl ItemFilter {
    /// Empty strings are treated as "no filter"
    pub fn new(search: Option<String>, category: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()),
            category: category.filter(|c| !c.is_empty()),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(search) = &self.search {
            if !item.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            match &item.category {
                Some(c) if c.to_lowercase() == category.to_lowercase() => {}
                _ => return false,
            }
        }
        true
    }
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Check that the store is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Create the lookup indexes used by the API
    async fn ensure_indexes(&self) -> StoreResult<()>;

    async fn insert(&self, item: &Item) -> StoreResult<()>;

    /// Matching items in insertion order, windowed by `skip`/`limit`
    async fn find(&self, filter: &ItemFilter, skip: u64, limit: u64) -> StoreResult<Vec<Item>>;

    async fn count(&self, filter: &ItemFilter) -> StoreResult<u64>;

    async fn find_one(&self, id: &str) -> StoreResult<Option<Item>>;

    /// Set the fields present in `changes` plus `updated_at`. Returns false if no item matched.
    async fn update_one(&self, id: &str, changes: &UpdateItemRequest, updated_at: DateTime<Utc>) -> StoreResult<bool>;

    /// Returns false if no item matched
    async fn delete_one(&self, id: &str) -> StoreResult<bool>;

    async fn summarize(&self) -> StoreResult<ItemStatsResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateItemRequest;

    fn item(name: &str, category: Option<&str>) -> Item {
        Item::new(CreateItemRequest {
            name: name.to_string(),
            description: None,
            price: 1.0,
            quantity: 1,
            category: category.map(str::to_string),
        })
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ItemFilter::new(Some(String::new()), Some(String::new()));
        assert_eq!(filter, ItemFilter::default());
        assert!(filter.matches(&item("Anything", None)));
    }

    #[test]
    fn search_and_category_combine() {
        let filter = ItemFilter::new(Some("LAP".to_string()), Some("electronics".to_string()));
        assert!(filter.matches(&item("Gaming laptop", Some("Electronics"))));
        assert!(!filter.matches(&item("Gaming laptop", Some("Furniture"))));
        assert!(!filter.matches(&item("Gaming laptop", None)));
        assert!(!filter.matches(&item("Desk", Some("Electronics"))));
    }

    #[test]
    fn category_is_a_whole_value_match() {
        let filter = ItemFilter::new(None, Some("Elec".to_string()));
        assert!(!filter.matches(&item("Laptop", Some("Electronics"))));
    }
}
