use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::db::{ItemFilter, StoreError};
use crate::models::{
    ApiError, CreateItemRequest, ErrorResponse, FieldError, Item, ItemStatsResponse, ListItemsQuery,
    MessageResponse, PaginatedItems, UpdateItemRequest, ValidatedJson, ValidatedQuery,
};
use crate::routes::AppState;

fn store_failure(action: &str, e: StoreError) -> ApiError {
    error!("Failed to {}: {}", action, e);
    ErrorResponse::internal(format!("Failed to {}", action))
}

fn item_not_found(item_id: &str) -> ApiError {
    ErrorResponse::not_found(format!("Item with ID '{}' not found", item_id))
}

/// Create a new item
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = Item::new(request);

    state
        .store
        .insert(&item)
        .await
        .map_err(|e| store_failure("create item", e))?;

    info!("Created item: {} - {}", item.id, item.name);
    Ok((StatusCode::CREATED, Json(item)))
}

/// List items with pagination, name search and category filter
pub async fn list_items(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListItemsQuery>,
) -> Result<(StatusCode, Json<PaginatedItems>), ApiError> {
    let page = query.page();
    let page_size = query.page_size();
    let filter = ItemFilter::new(query.search, query.category);

    let total = state
        .store
        .count(&filter)
        .await
        .map_err(|e| store_failure("count items", e))?;

    // Pages past the end are empty, whatever the page number
    let skip = (page - 1).saturating_mul(page_size).min(total);
    let items = state
        .store
        .find(&filter, skip, page_size)
        .await
        .map_err(|e| store_failure("list items", e))?;

    Ok((
        StatusCode::OK,
        Json(PaginatedItems {
            items,
            total,
            page,
            page_size,
            total_pages: PaginatedItems::total_pages(total, page_size),
        }),
    ))
}

/// Retrieve a single item by id
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    match state.store.find_one(&item_id).await {
        Ok(Some(item)) => Ok((StatusCode::OK, Json(item))),
        Ok(None) => Err(item_not_found(&item_id)),
        Err(e) => Err(store_failure("load item", e)),
    }
}

/// Update an existing item. Only the fields present in the body are changed.
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    ValidatedJson(changes): ValidatedJson<UpdateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let mut item = match state.store.find_one(&item_id).await {
        Ok(Some(item)) => item,
        Ok(None) => return Err(item_not_found(&item_id)),
        Err(e) => return Err(store_failure("load item", e)),
    };

    if changes.is_empty() {
        return Err(ErrorResponse::validation(vec![FieldError::new(
            &["body"],
            "No valid fields provided for update",
            "missing_fields",
        )]));
    }

    let updated_at = item.next_update_time();
    let matched = state
        .store
        .update_one(&item_id, &changes, updated_at)
        .await
        .map_err(|e| store_failure("update item", e))?;

    // Deleted between the lookup and the write
    if !matched {
        return Err(item_not_found(&item_id));
    }

    item.apply_update(&changes, updated_at);
    info!("Updated item: {}", item_id);
    Ok((StatusCode::OK, Json(item)))
}

/// Delete an item permanently
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    match state.store.find_one(&item_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(item_not_found(&item_id)),
        Err(e) => return Err(store_failure("load item", e)),
    }

    let deleted = state
        .store
        .delete_one(&item_id)
        .await
        .map_err(|e| store_failure("delete item", e))?;

    if !deleted {
        error!("Delete of item '{}' matched nothing after lookup", item_id);
        return Err(ErrorResponse::internal("Failed to delete item"));
    }

    info!("Deleted item: {}", item_id);
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new(
            "Item deleted successfully",
            format!("Item ID: {}", item_id),
        )),
    ))
}

/// Inventory statistics
pub async fn item_stats(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ItemStatsResponse>), ApiError> {
    let stats = state
        .store
        .summarize()
        .await
        .map_err(|e| store_failure("compute item statistics", e))?;

    Ok((StatusCode::OK, Json(stats)))
}
