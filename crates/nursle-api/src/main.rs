use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use nursle_auth::session::SessionKeys;
use nursle_storage::store::ObjectStore;
use nursle_triage::service::TriageService;
use nursle_triage::tables::TriageTables;

mod config;
mod error;
mod middleware;
mod router;
mod routes;
mod seed;
mod state;

use config::{ApiConfig, StorageBackend};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;

    let store = match config.storage {
        StorageBackend::S3 => {
            let client = nursle_storage::client::build_client().await;
            ObjectStore::s3(client, config.bucket.clone())
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, records are lost on restart");
            let store = ObjectStore::memory();
            seed::seed_dev_nurses(&store).await?;
            store
        }
    };

    let tables = match &config.triage_tables {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading triage tables");
            TriageTables::load(path)?
        }
        None => TriageTables::default(),
    };

    let state = AppState {
        store,
        triage: Arc::new(TriageService::new(tables, config.ai)),
        sessions: SessionKeys::new(config.secret_key.as_bytes(), config.session_ttl_secs),
    };

    let app = router::build_router(state);

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, storage = ?config.storage, "nursle api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
