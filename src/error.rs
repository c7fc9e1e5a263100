// error.rs — HTTP error surface for the tutoring API.
//
// Every handler funnels failures into ApiError so the wire shape stays
// uniform: 400 carries the per-field validation details, 500 carries a
// student-friendly line while the real cause is logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation. Each entry names one bad field.
    #[error("invalid request ({} problem(s))", .0.len())]
    Validation(Vec<String>),
    /// Anything unexpected. The client never sees the cause.
    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request", "details": details })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!("request failed: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "I ran into trouble processing that — please try again."
                    })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn validation_maps_to_400_with_details() {
        let resp =
            ApiError::Validation(vec!["code is required and must be a non-empty string".into()])
                .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["error"], "Invalid request");
        assert_eq!(
            v["details"][0],
            "code is required and must be a non-empty string"
        );
    }

    #[tokio::test]
    async fn internal_hides_the_cause_from_the_client() {
        let resp = ApiError::Internal(anyhow::anyhow!("upstream exploded")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let msg = v["error"].as_str().unwrap_or_default();
        assert!(msg.contains("try again"));
        assert!(!msg.contains("exploded"));
        assert!(v.get("details").is_none());
    }
}
