// src/server.rs
// =============================================================================
// The HTTP face of the analyze operation.
//
//   GET /?url=https://example.com  ->  200 + JSON CrawlReport
//
// The response is always 200: whatever went wrong during the crawl is
// described inside the report. A missing `url` parameter crawls the empty
// string, which comes back as a 400 "Bad Request" root status in the body.
//
// Each request runs its own independent crawl. The only shared state is the
// ProbeConfig, which is Copy and never mutated.
// =============================================================================

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::checker::ProbeConfig;
use crate::crawl::{analyze, CrawlReport};

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default)]
    url: String,
}

// Builds the router
pub fn router(config: ProbeConfig) -> Router {
    Router::new()
        .route("/", get(analyze_handler))
        .with_state(config)
}

async fn analyze_handler(
    State(config): State<ProbeConfig>,
    Query(query): Query<AnalyzeQuery>,
) -> Json<CrawlReport> {
    Json(analyze(&query.url, &config).await)
}

// Binds the address and serves until the process is stopped
pub async fn serve(bind: SocketAddr, config: ProbeConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;

    log::info!("Listening on http://{}/", bind);
    log::info!("  - Analyze: http://{}/?url=https://example.com", bind);

    axum::serve(listener, router(config))
        .await
        .context("Server error")?;

    Ok(())
}
