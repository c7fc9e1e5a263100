// rest/routes/analyze.rs — POST /analyze: the main tutoring endpoint.
//
// Flow: validate the raw body, run the heuristic detector and complexity
// estimator, then either ask the AI model (sanitizing its reply) or build
// the canned tutor reply. The learning state is updated server-side and
// echoed back so the client can persist it between requests.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::complexity::estimate_complexity;
use crate::analysis::detector::detect_errors;
use crate::analysis::validate::{parse_hint_level, validate_analyze_request};
use crate::analysis::{AnalysisRequest, ComplexityEstimate, DetectedError};
use crate::error::ApiError;
use crate::learning::LearningState;
use crate::sanitize::sanitize_reply;
use crate::tutor::{build_fallback, TutorReply};
use crate::AppContext;

/// Where the reply text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Llm,
    Fallback,
}

/// 200 body: the tutor reply plus everything the editor renders alongside it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub reply: TutorReply,
    pub detected_errors: Vec<DetectedError>,
    pub complexity: ComplexityEstimate,
    pub hint_level: u8,
    pub source: ReplySource,
    pub learning_state: LearningState,
}

pub async fn analyze(
    State(ctx): State<Arc<AppContext>>,
    Json(mut raw): Json<Value>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    ctx.metrics.inc_analyze_requests();
    // Correlation id tying this request's log lines together.
    let request_id = Uuid::new_v4();

    // Clients may omit hintLevel; it defaults to the gentlest hint.
    if raw.is_object() && raw.get("hintLevel").is_none() {
        raw["hintLevel"] = Value::from(1);
    }

    let verdict = validate_analyze_request(&raw);
    if !verdict.valid {
        ctx.metrics.inc_validation_failures();
        info!(request = %request_id, problems = verdict.errors.len(), "rejected invalid analyze request");
        return Err(ApiError::Validation(verdict.errors));
    }

    // Validation is lenient about spelling ("Python", "4"); the typed parse
    // is not. Normalize the lenient fields before deserializing.
    if let Some(n) = parse_hint_level(raw.get("hintLevel")) {
        raw["hintLevel"] = Value::from(n);
    }
    for field in ["language", "level"] {
        if let Some(s) = raw.get(field).and_then(Value::as_str) {
            raw[field] = Value::from(s.trim().to_ascii_lowercase());
        }
    }

    let req: AnalysisRequest = serde_json::from_value(raw)
        .map_err(|e| anyhow::anyhow!("validated request failed to deserialize: {e}"))?;

    let errors = detect_errors(&req.code, req.language);
    let complexity = estimate_complexity(&req.code, req.language);

    let (reply, source) = match respond_via_llm(&ctx, &req, &errors, &complexity).await {
        Some(reply) => (reply, ReplySource::Llm),
        None => (
            build_fallback(&req, &errors, &complexity),
            ReplySource::Fallback,
        ),
    };
    match source {
        ReplySource::Llm => ctx.metrics.inc_analyze_llm(),
        ReplySource::Fallback => ctx.metrics.inc_analyze_fallback(),
    }

    let state = req.learning_state.clone().unwrap_or_default();
    let learning_state = state.absorb(&errors, &reply.explanation);

    info!(
        request = %request_id,
        language = %req.language,
        errors = errors.len(),
        source = ?source,
        "analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        reply,
        detected_errors: errors,
        complexity,
        hint_level: req.hint_level,
        source,
        learning_state,
    }))
}

/// Ask the AI model. Any failure (no key, timeout, unusable reply) returns
/// None so the caller falls through to the built-in tutor.
async fn respond_via_llm(
    ctx: &AppContext,
    req: &AnalysisRequest,
    errors: &[DetectedError],
    complexity: &ComplexityEstimate,
) -> Option<TutorReply> {
    let client = ctx.llm.as_ref()?;
    match client.ask(req, errors, complexity).await {
        Ok(reply) => {
            let sanitized = sanitize_reply(reply.clone());
            if sanitized != reply {
                ctx.metrics.inc_solutions_redacted();
                info!("redacted a full solution from the AI reply");
            }
            Some(sanitized)
        }
        Err(e) => {
            ctx.metrics.inc_llm_failures();
            warn!("AI reply unavailable, using the built-in tutor: {e}");
            None
        }
    }
}
