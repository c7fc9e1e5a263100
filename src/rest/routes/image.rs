// rest/routes/image.rs — POST /analyze-image: read code out of a screenshot.
//
// Multipart body: `image` (file, required) and `level` (text, optional).
// The OCR upstream is best-effort; a missing key or a flaky vision service
// degrades to a friendly report instead of a 5xx.

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::Level;
use crate::error::ApiError;
use crate::llm::LlmError;
use crate::vision::{self, ImageReport};
use crate::AppContext;

pub async fn analyze_image(
    State(ctx): State<Arc<AppContext>>,
    mut multipart: Multipart,
) -> Result<Json<ImageReport>, ApiError> {
    ctx.metrics.inc_image_requests();

    let mut image: Option<Vec<u8>> = None;
    let mut level = Level::Basic;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("multipart read failed: {e}"))?
    {
        match field.name() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| anyhow::anyhow!("image field read failed: {e}"))?;
                image = Some(bytes.to_vec());
            }
            Some("level") => {
                if let Ok(text) = field.text().await {
                    if let Some(parsed) = Level::parse(&text) {
                        level = parsed;
                    }
                }
            }
            _ => {}
        }
    }

    let Some(image) = image else {
        ctx.metrics.inc_validation_failures();
        return Err(ApiError::Validation(vec![
            "image is required and must be a file field".to_string(),
        ]));
    };

    match vision::extract_text(ctx.llm.as_ref(), &image).await {
        Ok(text) => {
            let report = vision::describe_extracted(&text, level);
            info!(is_code = report.is_code, chars = text.len(), "image analyzed");
            Ok(Json(report))
        }
        Err(LlmError::MissingKey) => Ok(Json(ImageReport {
            extracted_text: String::new(),
            is_code: false,
            message: "Image reading isn't set up on this server yet — paste your code as text \
                      and I'll take a look."
                .to_string(),
            analysis: None,
        })),
        Err(e) => {
            warn!("vision extraction failed: {e}");
            Ok(Json(ImageReport {
                extracted_text: String::new(),
                is_code: false,
                message: "I couldn't read that image right now — please try again, or paste \
                          the code as text."
                    .to_string(),
                analysis: None,
            }))
        }
    }
}
