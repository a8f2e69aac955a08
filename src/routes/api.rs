use crate::handlers::{create_item, delete_item, get_item, health_check, item_stats, list_items, root, update_item};
use crate::routes::AppState;
use axum::{routing::get, Router};

/// Create API routes
pub fn create_api_routes(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/items", get(list_items).post(create_item))
        .route("/items/stats/summary", get(item_stats))
        .route("/items/:item_id", get(get_item).put(update_item).delete(delete_item))
        .with_state(state)
}
