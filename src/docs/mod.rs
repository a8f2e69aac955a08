use utoipa::OpenApi;
use crate::models::*;

/// Welcome message
#[utoipa::path(
    get,
    path = "/api/",
    tag = "General",
    responses(
        (status = 200, description = "Welcome message", body = MessageResponse)
    )
)]
#[allow(dead_code)]
pub async fn root_doc() {}

/// Health check endpoint, verifies database connectivity
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "General",
    responses(
        (status = 200, description = "Service and database are healthy", body = MessageResponse),
        (status = 503, description = "Database unreachable", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Create a new item
///
/// The id and both timestamps are generated by the server.
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created successfully", body = Item),
        (status = 422, description = "Invalid request body", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_item_doc() {}

/// List items with pagination and optional filtering
///
/// `search` matches a case-insensitive substring of the name, `category`
/// matches the whole category case-insensitively. Both combine with AND.
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "One page of items", body = PaginatedItems),
        (status = 422, description = "Invalid pagination parameters", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn list_items_doc() {}

/// Retrieve a single item by id
#[utoipa::path(
    get,
    path = "/api/items/{item_id}",
    tag = "Items",
    params(("item_id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_item_doc() {}

/// Update an existing item
///
/// Only the fields present in the body are changed; `updated_at` is always refreshed.
#[utoipa::path(
    put,
    path = "/api/items/{item_id}",
    tag = "Items",
    params(("item_id" = String, Path, description = "Item identifier")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "The updated item", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Invalid field value or empty update", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn update_item_doc() {}

/// Delete an item permanently
#[utoipa::path(
    delete,
    path = "/api/items/{item_id}",
    tag = "Items",
    params(("item_id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn delete_item_doc() {}

/// Inventory statistics
#[utoipa::path(
    get,
    path = "/api/items/stats/summary",
    tag = "Items",
    responses(
        (status = 200, description = "Aggregate statistics over all items", body = ItemStatsResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_stats_doc() {}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Item CRUD Lab - Item Management API",
        description = "Teaching-oriented REST API with Create, Read, Update and Delete operations over a single Item resource."
    ),
    paths(
        root_doc,
        health_check_doc,
        create_item_doc,
        list_items_doc,
        get_item_doc,
        update_item_doc,
        delete_item_doc,
        item_stats_doc,
    ),
    components(
        schemas(
            MessageResponse,
            ErrorResponse,
            FieldError,
            CreateItemRequest,
            UpdateItemRequest,
            Item,
            PaginatedItems,
            ItemStatsResponse
        )
    ),
    tags(
        (name = "General", description = "Service status"),
        (name = "Items", description = "Item management")
    )
)]
pub struct ApiDoc;
