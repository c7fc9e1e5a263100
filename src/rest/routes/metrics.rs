// rest/routes/metrics.rs — GET /metrics in Prometheus text format.

use axum::extract::State;
use std::sync::Arc;

use crate::AppContext;

pub async fn metrics(State(ctx): State<Arc<AppContext>>) -> String {
    ctx.metrics.render_prometheus()
}
