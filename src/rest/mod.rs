// rest/mod.rs — Public HTTP API server.
//
// Axum JSON API consumed by the browser editor. Requests are stateless; the
// only shared mutable state is the metrics counters. CORS is wide open so
// the editor can call from any origin, and CatchPanicLayer keeps a panicking
// handler from taking the process down.
//
// Endpoints:
//   GET  /health
//   POST /analyze
//   POST /run
//   POST /analyze-image
//   GET  /metrics

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::AppContext;

pub async fn start_server(ctx: Arc<AppContext>) -> Result<()> {
    let addr = ctx.config.listen_addr();
    let router = build_router(ctx);

    info!("tutoring API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/analyze", post(routes::analyze::analyze))
        .route("/run", post(routes::run::run))
        .route("/analyze-image", post(routes::image::analyze_image))
        .route("/metrics", get(routes::metrics::metrics))
        // Last layer added is outermost: CORS wraps trace wraps panic-catch.
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
