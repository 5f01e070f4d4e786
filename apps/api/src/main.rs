mod config;
mod db;
mod errors;
mod generation;
mod identity;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod store;
mod transfer;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::identity::Identity;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::local::{FileLocalStore, LocalStore, MemoryLocalStore};
use crate::store::remote::{PgRemoteStore, RemoteStore};
use crate::store::ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Local mirror
    let local: Arc<dyn LocalStore> = match &config.local_store_dir {
        Some(dir) => {
            let store = FileLocalStore::new(dir)?;
            info!("Local resume storage at {}", store.dir().display());
            Arc::new(store)
        }
        None => {
            warn!("LOCAL_STORE_DIR is blank; local resume storage lasts for this process only");
            Arc::new(MemoryLocalStore::default())
        }
    };

    // Remote store (optional)
    let remote: Option<Arc<dyn RemoteStore>> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            Some(Arc::new(PgRemoteStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; signed-in users are saved locally only");
            None
        }
    };

    // Resume store, reloaded on every identity change
    let store = Arc::new(ResumeStore::new(local, remote, config.save_debounce));
    let identity = Arc::new(Identity::new());
    tokio::spawn(store.clone().follow_identity(identity.subscribe()));
    info!(
        "Resume store initialized (save debounce: {:?})",
        config.save_debounce
    );

    let mut save_status = store.subscribe_save_status();
    tokio::spawn(async move {
        while save_status.changed().await.is_ok() {
            let status = *save_status.borrow_and_update();
            debug!("Remote save status: {status:?}");
        }
    });

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_url.clone(), config.openai_api_key.clone())?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("OPENAI_API_KEY not set; generation will return fallback text");
    }

    // Build app state
    let state = AppState {
        store,
        identity,
        generator: Arc::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
