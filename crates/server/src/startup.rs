use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use configs::{AppConfig, StoreBackend};
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::item::{ItemService, ItemStore, MemoryItemStore, SeaOrmItemStore};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

// Any origin, any headers. Development posture, matching the open CORS
// contract of the API.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Pick the store implementation from configuration. The Postgres backend
/// also brings the schema up to date.
async fn build_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn ItemStore>> {
    match cfg.store.backend {
        StoreBackend::Memory => {
            info!("using in-memory item store");
            Ok(Arc::new(MemoryItemStore::new()))
        }
        StoreBackend::Postgres => {
            let db = models::db::connect(&cfg.database).await?;
            migration::Migrator::up(&db, None).await?;
            info!("using postgres item store");
            Ok(Arc::new(SeaOrmItemStore::new(db)))
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_and_validate()?;

    let store = build_store(&cfg).await?;
    let state = ServerState { items: Arc::new(ItemService::new(store)) };

    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting item service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
