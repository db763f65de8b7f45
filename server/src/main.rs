use std::error::Error;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use dev_events_server::config::{Config, StorageBackend};
use dev_events_server::routes::create_routes;
use dev_events_server::state::AppState;
use dev_events_server::storage::{EventStore, InMemoryEventStore, PgEventStore};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    if let Err(e) = run(Config::from_env()).await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), BoxError> {
    let store: Arc<dyn EventStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let store = PgEventStore::connect(&config.database_url, config.max_connections).await?;
            tracing::info!("Successfully connected to database");

            store.migrate().await?;
            tracing::info!("Migrations run successfully");

            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data will be lost on shutdown");
            Arc::new(InMemoryEventStore::new())
        }
    };

    let app = create_routes(AppState::new(store), &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(environment = %config.environment, "🚀 Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
