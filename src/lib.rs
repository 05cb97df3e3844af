pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod pipeline;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{LogisticsError, LogisticsResult};

// Export logic types
pub use logic::{flight_log_update, record_landing, spawn_landing_listener};

// Export all model types
pub use model::*;

// Export pipeline entry points
pub use pipeline::{reduce_cities, run_all, seed_planes, StageReport};

// Export seed module
pub use seed::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use axum::{serve, Router};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::{AppConfig, ServerConfig, StorageBackend};

/// Connect to PostgreSQL and bring the schema up to date
pub async fn connect_postgres(config: &AppConfig) -> anyhow::Result<PostgresStore> {
    let database_url = config.database_url()?;
    let max_connections = config.database.max_connections.unwrap_or(20);
    let postgres_store = PostgresStore::new(&database_url, max_connections).await?;

    postgres_store.migrate().await?;
    Ok(postgres_store)
}

/// In-memory store preloaded with the built-in raw dataset
pub async fn memory_store() -> anyhow::Result<MemoryStore> {
    let store = MemoryStore::new();
    let count = load_seed_data(&store).await?;
    info!("Loaded {} demo cities into the memory store", count);
    Ok(store)
}

/// The API router, with the static directory (if any) as fallback
pub fn build_app<S: Store + 'static>(store: Arc<S>, server: &ServerConfig) -> Router {
    let router = routes::create_router().with_state(store);
    match &server.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Seed if configured, start the landing listener and serve until shutdown
pub async fn serve_store<S: Store + 'static>(
    listener: TcpListener,
    store: Arc<S>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    if config.seeding.run_on_startup {
        run_all(&*store, &config.seeding).await?;
    }

    spawn_landing_listener(store.clone());

    info!("Logistics server listening on http://{}", listener.local_addr()?);
    serve(listener, build_app(store, &config.server)).await?;

    Ok(())
}

/// Info for everything, sqlx only from Warn
pub fn init_logging() {
    use env_logger::Builder;
    use log::LevelFilter;

    let _ = Builder::new()
        .filter_level(LevelFilter::Info)      // Default to Info for everything
        .filter_module("sqlx", LevelFilter::Warn)  // Suppress sqlx Debug logs
        .try_init();
}

/// Open the configured backend and serve it on `listener`
pub async fn serve_configured(listener: TcpListener, config: &AppConfig) -> anyhow::Result<()> {
    match config.database.backend {
        StorageBackend::Postgres => {
            let store = Arc::new(connect_postgres(config).await?);
            serve_store(listener, store, config).await
        }
        StorageBackend::Memory => {
            let store = Arc::new(memory_store().await?);
            serve_store(listener, store, config).await
        }
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::load()?;
    info!(
        "Configuration loaded: server={} backend={:?}",
        config.server_address(),
        config.database.backend
    );

    let listener = TcpListener::bind(config.server_address()).await?;
    serve_configured(listener, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CityStore, WorldCityStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging();
        init_logging();
        log::info!("logging initialised twice");
    }

    #[tokio::test]
    async fn test_memory_store_starts_with_raw_dataset() {
        let store = memory_store().await.unwrap();
        let raw = store.list_world_cities().await.unwrap();
        assert!(!raw.is_empty());
        assert!(store.list_cities().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_static_dir_is_the_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>map</h1>").unwrap();

        let server = ServerConfig {
            static_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..ServerConfig::default()
        };
        let app = build_app(Arc::new(MemoryStore::new()), &server);

        let response = app
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>map</h1>");

        // API routes still win over the fallback
        let app = build_app(Arc::new(MemoryStore::new()), &server);
        let response = app
            .oneshot(Request::get("/planes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
