//! MongoDB item store.
//!
//! Items are stored as documents with the same field names as the API shape;
//! timestamps are RFC 3339 strings. The native `_id` is projected away on
//! every read and only used to keep listings in insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, Document},
    options::{ClientOptions, IndexOptions},
    Client, Collection, IndexModel,
};
use tracing::{debug, info};

use crate::db::{ItemFilter, ItemStore, StoreError, StoreResult};
use crate::models::{round2, Item, ItemStatsResponse, UpdateItemRequest};

#[derive(Debug, Clone)]
pub struct MongoItemStore {
    client: Client,
    database: String,
    collection: String,
}

impl MongoItemStore {
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        Self {
            client,
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }

    /// Parse the connection string and build a client. No round trip happens
    /// until the first operation.
    pub async fn connect(dsn: &str, database: &str, collection: &str) -> StoreResult<Self> {
        info!("Connecting to MongoDB database '{}'...", database);
        let options = ClientOptions::parse(dsn)
            .await
            .map_err(|e| StoreError::Initialization(e.to_string()))?;
        let client = Client::with_options(options)
            .map_err(|e| StoreError::Initialization(e.to_string()))?;
        Ok(Self::new(client, database, collection))
    }

    fn items(&self) -> Collection<Item> {
        self.client.database(&self.database).collection(&self.collection)
    }

    fn documents(&self) -> Collection<Document> {
        self.client.database(&self.database).collection(&self.collection)
    }
}

fn backend(e: mongodb::error::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Translate an [`ItemFilter`] into a MongoDB query document
pub(crate) fn filter_document(filter: &ItemFilter) -> Document {
    let mut query = Document::new();
    if let Some(search) = &filter.search {
        query.insert("name", doc! { "$regex": regex::escape(search), "$options": "i" });
    }
    if let Some(category) = &filter.category {
        query.insert("category", doc! { "$regex": format!("^{}$", regex::escape(category)), "$options": "i" });
    }
    query
}

/// Build the `$set` document for a partial update
pub(crate) fn set_document(changes: &UpdateItemRequest, updated_at: DateTime<Utc>) -> StoreResult<Document> {
    let mut set = Document::new();
    if let Some(name) = &changes.name {
        set.insert("name", name.as_str());
    }
    if let Some(description) = &changes.description {
        set.insert("description", description.as_str());
    }
    if let Some(price) = changes.price {
        set.insert("price", price);
    }
    if let Some(quantity) = changes.quantity {
        set.insert("quantity", quantity);
    }
    if let Some(category) = &changes.category {
        set.insert("category", category.as_str());
    }
    // Same encoding as a full item write
    let updated_at = bson::to_bson(&updated_at).map_err(|e| StoreError::Serialization(e.to_string()))?;
    set.insert("updated_at", updated_at);
    Ok(set)
}

fn number(doc: &Document, key: &str) -> f64 {
    match doc.get(key) {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => *v as f64,
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

fn integer(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => *v as i64,
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}

#[async_trait]
impl ItemStore for MongoItemStore {
    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "name": 1 }).build(),
            IndexModel::builder().keys(doc! { "category": 1 }).build(),
        ];
        self.items().create_indexes(indexes).await.map_err(backend)?;
        Ok(())
    }

    async fn insert(&self, item: &Item) -> StoreResult<()> {
        self.items().insert_one(item).await.map_err(backend)?;
        Ok(())
    }

    async fn find(&self, filter: &ItemFilter, skip: u64, limit: u64) -> StoreResult<Vec<Item>> {
        let query = filter_document(filter);
        debug!("Finding items: {} (skip {}, limit {})", query, skip, limit);
        self.items()
            .find(query)
            .projection(doc! { "_id": 0 })
            .sort(doc! { "_id": 1 })
            .skip(skip)
            .limit(limit as i64)
            .await
            .map_err(backend)?
            .try_collect::<Vec<Item>>()
            .await
            .map_err(backend)
    }

    async fn count(&self, filter: &ItemFilter) -> StoreResult<u64> {
        self.items()
            .count_documents(filter_document(filter))
            .await
            .map_err(backend)
    }

    async fn find_one(&self, id: &str) -> StoreResult<Option<Item>> {
        self.items()
            .find_one(doc! { "id": id })
            .projection(doc! { "_id": 0 })
            .await
            .map_err(backend)
    }

    async fn update_one(&self, id: &str, changes: &UpdateItemRequest, updated_at: DateTime<Utc>) -> StoreResult<bool> {
        let set = set_document(changes, updated_at)?;
        let result = self
            .items()
            .update_one(doc! { "id": id }, doc! { "$set": set })
            .await
            .map_err(backend)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, id: &str) -> StoreResult<bool> {
        let result = self
            .items()
            .delete_one(doc! { "id": id })
            .await
            .map_err(backend)?;
        Ok(result.deleted_count > 0)
    }

    async fn summarize(&self) -> StoreResult<ItemStatsResponse> {
        let totals = self
            .documents()
            .aggregate(vec![doc! {
                "$group": {
                    "_id": Bson::Null,
                    "total_items": { "$sum": 1 },
                    "total_quantity": { "$sum": "$quantity" },
                    "total_value": { "$sum": { "$multiply": ["$price", "$quantity"] } },
                    "average_price": { "$avg": "$price" },
                    "min_price": { "$min": "$price" },
                    "max_price": { "$max": "$price" },
                }
            }])
            .await
            .map_err(backend)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend)?;

        let Some(totals) = totals.first() else {
            return Ok(ItemStatsResponse::default());
        };

        let per_category = self
            .documents()
            .aggregate(vec![
                doc! { "$match": { "category": { "$nin": [Bson::Null, ""] } } },
                doc! { "$group": { "_id": "$category", "count": { "$sum": 1 } } },
                doc! { "$sort": { "_id": 1 } },
            ])
            .await
            .map_err(backend)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend)?;

        let category_counts = per_category
            .iter()
            .filter_map(|group| {
                let name = group.get_str("_id").ok()?;
                Some((name.to_string(), integer(group, "count") as u64))
            })
            .collect::<std::collections::BTreeMap<_, _>>();

        Ok(ItemStatsResponse {
            total_items: integer(totals, "total_items") as u64,
            total_quantity: integer(totals, "total_quantity"),
            total_value: round2(number(totals, "total_value")),
            average_price: round2(number(totals, "average_price")),
            min_price: number(totals, "min_price"),
            max_price: number(totals, "max_price"),
            categories: category_counts.keys().cloned().collect(),
            category_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_metacharacters_literally() {
        let filter = ItemFilter::new(Some("c++ (v2)".to_string()), Some("a.b".to_string()));
        assert_eq!(
            filter_document(&filter),
            doc! {
                "name": { "$regex": "c\\+\\+ \\(v2\\)", "$options": "i" },
                "category": { "$regex": "^a\\.b$", "$options": "i" },
            }
        );
    }

    #[test]
    fn filter_translation() {
        assert_eq!(filter_document(&ItemFilter::default()), doc! {});

        let filter = ItemFilter::new(Some("lap".to_string()), Some("Electronics".to_string()));
        assert_eq!(
            filter_document(&filter),
            doc! {
                "name": { "$regex": "lap", "$options": "i" },
                "category": { "$regex": "^Electronics$", "$options": "i" },
            }
        );
    }

    #[test]
    fn set_document_contains_only_given_fields() {
        let changes = UpdateItemRequest { price: Some(899.99), ..Default::default() };
        let at = Utc::now();
        let set = set_document(&changes, at).unwrap();

        let keys: Vec<&str> = set.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["price", "updated_at"]);
        assert_eq!(set.get_f64("price").unwrap(), 899.99);
        assert_eq!(set.get("updated_at"), Some(&bson::to_bson(&at).unwrap()));
    }

    #[test]
    fn numeric_fields_accept_any_bson_number() {
        let doc = doc! { "a": 2_i32, "b": 3_i64, "c": 1.5 };
        assert_eq!(number(&doc, "a"), 2.0);
        assert_eq!(integer(&doc, "b"), 3);
        assert_eq!(number(&doc, "c"), 1.5);
        assert_eq!(integer(&doc, "missing"), 0);
    }
}
