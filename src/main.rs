mod config;
mod db;
mod error;
mod model;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::store::Store;
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ulpack=info,tower_http=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env().expect("invalid configuration");

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::init_pool(database_url, config.db_max_connections)
                .await
                .expect("database init failed");
            tracing::info!(max_connections = config.db_max_connections, "using postgres store");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set — using in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };
    let state = state::AppState::new(store);

    if config.seed_sample_data {
        services::sample_data::seed_sample_gear(state.store())
            .await
            .expect("sample data seeding failed");
    }

    let app = routes::app(state, &config.allowed_origins);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "ulpack listening");
    axum::serve(listener, app).await.expect("server failed");
}
