use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Item;

/// Inventory statistics over every stored item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemStatsResponse {
    pub total_items: u64,
    pub total_quantity: i64,
    /// Sum of price * quantity, rounded to 2 decimals
    pub total_value: f64,
    /// Rounded to 2 decimals
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Distinct non-empty categories, sorted
    pub categories: Vec<String>,
    /// Number of items per category; items without a category are not counted
    pub category_counts: BTreeMap<String, u64>,
}

impl ItemStatsResponse {
    /// Fold a full scan of the collection into statistics
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut stats = ItemStatsResponse::default();
        let mut price_sum = 0.0;
        let mut total_value = 0.0;

        for item in items {
            if stats.total_items == 0 {
                stats.min_price = item.price;
                stats.max_price = item.price;
            } else {
                stats.min_price = stats.min_price.min(item.price);
                stats.max_price = stats.max_price.max(item.price);
            }
            stats.total_items += 1;
            stats.total_quantity += item.quantity;
            price_sum += item.price;
            total_value += item.price * item.quantity as f64;

            if let Some(category) = item.category.as_deref().filter(|c| !c.is_empty()) {
                *stats.category_counts.entry(category.to_string()).or_insert(0) += 1;
            }
        }

        if stats.total_items > 0 {
            stats.average_price = round2(price_sum / stats.total_items as f64);
        }
        stats.total_value = round2(total_value);
        stats.categories = stats.category_counts.keys().cloned().collect();
        stats
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
