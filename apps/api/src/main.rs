mod analysis;
mod catalog;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod manuscript;
mod matching;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{seed::load_seed, store::load_catalog, Catalog};
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::DocumentExtractor;
use crate::matching::build_matcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ScopeMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the journal catalog (PostgreSQL when configured, otherwise seed data)
    let seed = load_seed(config.journal_seed_path.as_deref())?;
    let catalog = match &config.database_url {
        Some(url) => {
            let db = create_pool(url).await?;
            let seed = config.seed_catalog.then_some(seed.as_slice());
            load_catalog(&db, seed).await?
        }
        None => {
            info!("DATABASE_URL not set; serving the catalog from seed data");
            Catalog::new(seed)?
        }
    };
    info!("Journal catalog ready: {} journal(s)", catalog.len());

    // Initialize the scope matcher (LlmScopeMatcher by default; swap via MATCHER_BACKEND)
    let matcher = build_matcher(config.matcher_backend, config.llm.as_ref())?;
    info!("Scope matcher: {}", matcher.backend_name());

    // Build app state
    let state = AppState {
        catalog: Arc::new(catalog),
        matcher,
        extractor: DocumentExtractor::new(config.extractor.clone()),
        max_results: config.max_results,
        max_upload_bytes: config.max_upload_bytes,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
