use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{FieldError, Validate, Validator};

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const CATEGORY_MAX_LEN: usize = 50;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Request body for creating an item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    /// Name of the item (1-100 characters)
    #[schema(example = "Laptop")]
    pub name: String,
    /// Description of the item (max 500 characters)
    #[schema(example = "High-performance laptop for coding")]
    pub description: Option<String>,
    /// Price of the item, must be greater than 0
    #[schema(example = 999.99)]
    pub price: f64,
    /// Quantity in stock, must be >= 0
    #[schema(example = 10)]
    pub quantity: i64,
    /// Category of the item (max 50 characters)
    #[schema(example = "Electronics")]
    pub category: Option<String>,
}

impl Validate for CreateItemRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new("body");
        v.length("name", &self.name, 1, NAME_MAX_LEN);
        if let Some(description) = &self.description {
            v.length("description", description, 0, DESCRIPTION_MAX_LEN);
        }
        v.greater_than("price", self.price, 0.0);
        v.at_least("quantity", self.quantity, 0);
        if let Some(category) = &self.category {
            v.length("category", category, 0, CATEGORY_MAX_LEN);
        }
        v.finish()
    }
}

/// Request body for a partial update. Absent or null fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(example = 899.99)]
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub category: Option<String>,
}

impl UpdateItemRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
    }
}

impl Validate for UpdateItemRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new("body");
        if let Some(name) = &self.name {
            v.length("name", name, 1, NAME_MAX_LEN);
        }
        if let Some(description) = &self.description {
            v.length("description", description, 0, DESCRIPTION_MAX_LEN);
        }
        if let Some(price) = self.price {
            v.greater_than("price", price, 0.0);
        }
        if let Some(quantity) = self.quantity {
            v.at_least("quantity", quantity, 0);
        }
        if let Some(category) = &self.category {
            v.length("category", category, 0, CATEGORY_MAX_LEN);
        }
        v.finish()
    }
}

/// A stored item, as persisted and as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Unique identifier, generated on creation
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Build a new item with a fresh id; both timestamps are the same instant
    pub fn new(request: CreateItemRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
            category: request.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields present in `changes` and stamp `updated_at`
    pub fn apply_update(&mut self, changes: &UpdateItemRequest, updated_at: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(category) = &changes.category {
            self.category = Some(category.clone());
        }
        self.updated_at = updated_at;
    }

    /// Timestamp for the next write, always strictly after the current `updated_at`
    pub fn next_update_time(&self) -> DateTime<Utc> {
        let now = Utc::now();
        if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        }
    }
}

/// Query parameters for listing items
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// Page number, starting from 1
    pub page: Option<i64>,
    /// Items per page (1-100, default 10)
    pub page_size: Option<i64>,
    /// Case-insensitive substring of the item name
    pub search: Option<String>,
    /// Category to filter by (case-insensitive)
    pub category: Option<String>,
}

impl ListItemsQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1) as u64
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as u64
    }
}

impl Validate for ListItemsQuery {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new("query");
        if let Some(page) = self.page {
            v.at_least("page", page, 1);
        }
        if let Some(page_size) = self.page_size {
            v.at_least("page_size", page_size, 1).at_most("page_size", page_size, MAX_PAGE_SIZE);
        }
        v.finish()
    }
}

/// Response for listing items
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedItems {
    pub items: Vec<Item>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl PaginatedItems {
    /// A listing with no matches still reports one (empty) page
    pub fn total_pages(total: u64, page_size: u64) -> u64 {
        if total == 0 {
            1
        } else {
            total.div_ceil(page_size)
        }
    }
}
