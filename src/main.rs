mod models;
mod handlers;
mod routes;
mod docs;
mod config;
mod db;

use std::sync::Arc;

use config::{Config, StoreBackend};
use db::{ItemStore, MemoryItemStore, MongoItemStore};
use routes::{build_router, AppState};
use tracing::{info, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use std::panic;

#[tokio::main]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Load configuration before logging so the log level can come from it
    let loaded = Config::load();
    let log_level = loaded
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("item_crud_lab={log_level},tower_http=debug,axum::rejection=trace,info").into()
        }))
        .init();

    info!("Starting Item CRUD Lab...");

    let config = match loaded {
        Ok(config) => {
            info!("✅ Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            warn!("Using default configuration");
            Config::default()
        }
    };

    let store: Arc<dyn ItemStore> = match config.store_backend {
        StoreBackend::Mongodb => {
            match MongoItemStore::connect(&config.mongo_url, &config.db_name, &config.items_collection).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Failed to initialize MongoDB client: {}", e);
                    std::process::exit(1);
                }
            }
        }
        StoreBackend::Memory => {
            if config.is_production() {
                warn!("In-memory item store selected in a production environment");
            }
            warn!("Using in-memory item store - data is lost on restart");
            Arc::new(MemoryItemStore::new())
        }
    };

    match store.ensure_indexes().await {
        Ok(()) => info!("Database indexes created"),
        Err(e) => warn!("Failed to create database indexes: {}", e),
    }

    let app_routes = build_router(AppState::new(store), &config);

    // Start the HTTP/API server
    let listener = match tokio::net::TcpListener::bind(config.server_address()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", config.server_address(), e);
            std::process::exit(1);
        }
    };

    info!("🚀 Server running on http://{}", config.server_address());
    info!("📚 Swagger UI available at http://{}/api/docs", config.server_address());
    info!("📖 ReDoc available at http://{}/api/redoc", config.server_address());

    if let Err(e) = axum::serve(listener, app_routes)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Shutting down Item CRUD Lab...");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
