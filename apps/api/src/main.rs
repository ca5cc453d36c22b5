mod advisor;
mod config;
mod errors;
mod industry;
mod llm_client;
mod resume;
mod routes;
mod session;
mod simulation;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::industry::risk::TransitionMap;
use crate::industry::TableCache;
use crate::llm_client::{ChatModel, LlmClient};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cycle API v{}", env!("CARGO_PKG_VERSION"));

    // Load the reference table eagerly so a bad source shows up at startup.
    // Requests keep failing with 503 until the source is fixed on disk.
    let tables = Arc::new(TableCache::new());
    match tables.load(&config.industry_data_path) {
        Ok(table) if table.is_empty() => warn!(
            "Reference table at {} has no rows; every lookup will miss",
            config.industry_data_path.display()
        ),
        Ok(_) => {}
        Err(e) => warn!("Reference table unavailable at startup: {e}"),
    }

    let transitions = match &config.transition_map_path {
        Some(path) => {
            let map = TransitionMap::from_json_file(path)?;
            info!(
                "Transition map loaded from {} ({} keywords)",
                path.display(),
                map.entries().len()
            );
            map
        }
        None => TransitionMap::default(),
    };

    let llm: Option<Arc<dyn ChatModel>> = match &config.llm_api_key {
        Some(key) => {
            let client = LlmClient::new(
                key.clone(),
                config.llm_base_url.clone(),
                config.llm_model.clone(),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => {
            warn!("LLM_API_KEY not set; advisor disabled, resume parsing uses keyword fallback");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        tables,
        transitions: Arc::new(transitions),
        llm,
        sessions: SessionStore::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
