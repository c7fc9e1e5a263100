use crate::AppContext;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let uptime = ctx.started_at.elapsed().as_secs();
    Json(json!({
        "status": "ok",
        "message": "Code tutor is ready to help.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_secs": uptime,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
