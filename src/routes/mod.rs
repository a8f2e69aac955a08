pub mod api;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::db::ItemStore;
use crate::docs::ApiDoc;
use crate::handlers::{landing_page, root};

pub use api::create_api_routes;

/// Shared handler state. The store is the only resource shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }
}

/// Assemble the full application: landing page, API, docs and middleware
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(landing_page))
        // Nesting maps the API root to "/api"; serve the trailing-slash form too
        .route("/api/", get(root))
        .nest("/api", create_api_routes(state))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/api/redoc", ApiDoc::openapi()))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    match config.allowed_origins() {
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", origin);
                        None
                    }
                })
                .collect();
            // Wildcards are not allowed together with credentials
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ItemFilter, MemoryItemStore, StoreError, StoreResult};
    use crate::models::{ErrorResponse, Item, ItemStatsResponse, MessageResponse, UpdateItemRequest};
    use anyhow::{Context, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::{DateTime, Utc};
    use tower::ServiceExt;

    /// Store whose every operation fails, as if the database were down
    struct UnreachableStore;

    fn down<T>() -> StoreResult<T> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    #[async_trait]
    impl ItemStore for UnreachableStore {
        async fn ping(&self) -> StoreResult<()> { down() }
        async fn ensure_indexes(&self) -> StoreResult<()> { down() }
        async fn insert(&self, _: &Item) -> StoreResult<()> { down() }
        async fn find(&self, _: &ItemFilter, _: u64, _: u64) -> StoreResult<Vec<Item>> { down() }
        async fn count(&self, _: &ItemFilter) -> StoreResult<u64> { down() }
        async fn find_one(&self, _: &str) -> StoreResult<Option<Item>> { down() }
        async fn update_one(&self, _: &str, _: &UpdateItemRequest, _: DateTime<Utc>) -> StoreResult<bool> { down() }
        async fn delete_one(&self, _: &str) -> StoreResult<bool> { down() }
        async fn summarize(&self) -> StoreResult<ItemStatsResponse> { down() }
    }

    fn router_with(store: Arc<dyn ItemStore>, config: &Config) -> Router {
        build_router(AppState::new(store), config)
    }

    async fn get(router: Router, uri: &str) -> Result<(StatusCode, Vec<u8>)> {
        let request = Request::builder().uri(uri).body(Body::empty()).context("build request")?;
        let response = router.oneshot(request).await.unwrap_or_else(|err| match err {});
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
            .await
            .context("read response body")?;
        Ok((status, body.to_vec()))
    }

    #[tokio::test]
    async fn health_ok_when_store_reachable() -> Result<()> {
        let router = router_with(Arc::new(MemoryItemStore::new()), &Config::default());
        let (status, body) = get(router, "/api/health").await?;
        assert_eq!(status, StatusCode::OK);
        let health: MessageResponse = serde_json::from_slice(&body).context("parse JSON body")?;
        assert_eq!(health.message, "API is healthy!");
        Ok(())
    }

    #[tokio::test]
    async fn health_degraded_when_store_unreachable() -> Result<()> {
        let router = router_with(Arc::new(UnreachableStore), &Config::default());
        let (status, body) = get(router, "/api/health").await?;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let error: ErrorResponse = serde_json::from_slice(&body).context("parse JSON body")?;
        assert!(error.error.starts_with("Database connection failed"));
        Ok(())
    }

    #[tokio::test]
    async fn store_failures_surface_as_server_errors() -> Result<()> {
        let store: Arc<dyn ItemStore> = Arc::new(UnreachableStore);
        for uri in ["/api/items", "/api/items/some-id", "/api/items/stats/summary"] {
            let (status, body) = get(router_with(store.clone(), &Config::default()), uri).await?;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            let error: ErrorResponse = serde_json::from_slice(&body).context("parse JSON body")?;
            assert!(!error.error.contains("connection refused"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn root_answers_with_and_without_trailing_slash() -> Result<()> {
        for uri in ["/api", "/api/"] {
            let router = router_with(Arc::new(MemoryItemStore::new()), &Config::default());
            let (status, body) = get(router, uri).await?;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            let message: MessageResponse = serde_json::from_slice(&body).context("parse JSON body")?;
            assert!(message.message.starts_with("Welcome"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn landing_page_links_to_docs() -> Result<()> {
        let router = router_with(Arc::new(MemoryItemStore::new()), &Config::default());
        let (status, body) = get(router, "/").await?;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body)?;
        assert!(html.contains("Item CRUD Lab"));
        assert!(html.contains("/api/docs"));
        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_lists_item_routes() -> Result<()> {
        let router = router_with(Arc::new(MemoryItemStore::new()), &Config::default());
        let (status, body) = get(router, "/api/openapi.json").await?;
        assert_eq!(status, StatusCode::OK);
        let spec: serde_json::Value = serde_json::from_slice(&body).context("parse JSON body")?;
        let paths = spec.get("paths").context("paths")?;
        for path in ["/api/items", "/api/items/{item_id}", "/api/items/stats/summary", "/api/health"] {
            assert!(paths.get(path).is_some(), "missing {}", path);
        }

        let router = router_with(Arc::new(MemoryItemStore::new()), &Config::default());
        let (status, _) = get(router, "/api/redoc").await?;
        assert_eq!(status, StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn cors_echoes_allowed_origin() -> Result<()> {
        let config = Config {
            cors_origins: "https://lab.example".to_string(),
            ..Config::default()
        };
        let router = router_with(Arc::new(MemoryItemStore::new()), &config);
        let request = Request::builder()
            .uri("/api/items")
            .header(header::ORIGIN, "https://lab.example")
            .body(Body::empty())
            .context("build request")?;
        let response = router.oneshot(request).await.unwrap_or_else(|err| match err {});
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://lab.example"))
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some(&HeaderValue::from_static("true"))
        );
        Ok(())
    }
}
