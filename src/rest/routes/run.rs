// rest/routes/run.rs — POST /run: proxy student code to the execution sandbox.
//
// Upstream failure is never a 5xx here; the client always gets a RunOutcome
// and a broken sandbox shows up as success:false with a friendly error line.
// The body is validated from the raw JSON value (like /analyze) so missing
// fields produce the shared 400 shape instead of an extractor rejection.

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::analysis::Language;
use crate::error::ApiError;
use crate::exec::RunOutcome;
use crate::AppContext;

pub async fn run(
    State(ctx): State<Arc<AppContext>>,
    Json(raw): Json<Value>,
) -> Result<Json<RunOutcome>, ApiError> {
    ctx.metrics.inc_run_requests();

    let mut problems = Vec::new();

    let code = raw.get("code").and_then(Value::as_str).unwrap_or("");
    if code.trim().is_empty() {
        problems.push("code is required and must be a non-empty string".to_string());
    }

    let language = raw
        .get("language")
        .and_then(Value::as_str)
        .and_then(Language::parse);
    if language.is_none() {
        problems.push(format!(
            "language is required and must be one of: {}",
            Language::ALLOWED.join(", ")
        ));
    }

    match language {
        Some(language) if problems.is_empty() => {
            let stdin = raw.get("input").and_then(Value::as_str);
            let outcome = ctx.exec.run_code(language, code, stdin).await;
            info!(
                language = %language,
                success = outcome.success,
                ms = outcome.execution_time,
                "run finished"
            );
            Ok(Json(outcome))
        }
        _ => {
            ctx.metrics.inc_validation_failures();
            Err(ApiError::Validation(problems))
        }
    }
}
