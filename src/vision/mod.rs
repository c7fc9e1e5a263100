//! Image-to-code extraction for `/analyze-image`.
//!
//! The heavy lifting (OCR) is delegated to the vision-capable chat model;
//! this module owns the data-URI packaging, the is-this-code heuristic, and
//! the report the route returns. Without an API key the endpoint degrades
//! to a friendly "not configured" message at the route level.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::analysis::complexity::estimate_complexity;
use crate::analysis::detector::detect_errors;
use crate::analysis::{Language, Level};
use crate::llm::{ChatMessage, LlmClient, LlmError};
use crate::tutor::templates;

const EXTRACT_PROMPT: &str = "Extract all text from this image exactly as written, preserving \
                              line breaks and indentation. Reply with only the extracted text \
                              and no commentary. If the image contains no readable text, reply \
                              with exactly NO_TEXT.";

/// What `/analyze-image` returns to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub extracted_text: String,
    pub is_code: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// OCR an image through the vision model. Empty string means "no text".
pub async fn extract_text(client: Option<&LlmClient>, image: &[u8]) -> Result<String, LlmError> {
    let client = client.ok_or(LlmError::MissingKey)?;

    let data_uri = format!("data:{};base64,{}", sniff_mime(image), STANDARD.encode(image));
    let parts = serde_json::json!([
        { "type": "text", "text": EXTRACT_PROMPT },
        { "type": "image_url", "image_url": { "url": data_uri } },
    ]);

    let content = client
        .chat(client.vision_model(), &[ChatMessage::user_parts(parts)], 1200)
        .await?;

    let text = content.trim();
    if text == "NO_TEXT" {
        Ok(String::new())
    } else {
        Ok(text.to_string())
    }
}

/// Turn extracted text into the client-facing report, running the regular
/// detector and complexity passes when the text looks like code.
pub fn describe_extracted(text: &str, level: Level) -> ImageReport {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ImageReport {
            extracted_text: String::new(),
            is_code: false,
            message: "I couldn't read any text from that image. Try a clearer, well-lit photo."
                .to_string(),
            analysis: None,
        };
    }

    if !looks_like_code(trimmed) {
        return ImageReport {
            extracted_text: trimmed.to_string(),
            is_code: false,
            message: "I can read the text, but it doesn't look like code. If there should be \
                      code in the image, try a sharper screenshot."
                .to_string(),
            analysis: None,
        };
    }

    let language = Language::guess(trimmed);
    let errors = detect_errors(trimmed, language);
    let complexity = estimate_complexity(trimmed, language);

    let message = if errors.is_empty() {
        format!("This looks like {language} code. Nothing jumped out as broken.")
    } else {
        format!(
            "This looks like {language} code. I spotted {} thing{} worth checking.",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" },
        )
    };

    let analysis = match errors.first() {
        Some(first) => format!(
            "{} {} Estimated complexity: {} in the worst case.",
            first.description,
            templates::template_for(first.kind, level).explanation,
            complexity.worst,
        ),
        None => format!(
            "Estimated complexity: {} in the worst case. {}",
            complexity.worst, complexity.explanation,
        ),
    };

    ImageReport {
        extracted_text: trimmed.to_string(),
        is_code: true,
        message,
        analysis: Some(analysis),
    }
}

// ─── Heuristics ───────────────────────────────────────────────────────────────

/// Whole-text judgment: at least 40% of non-empty lines look like code.
pub fn looks_like_code(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return false;
    }
    let codey = lines.iter().filter(|l| line_looks_like_code(l)).count();
    codey * 5 >= lines.len() * 2
}

fn line_looks_like_code(line: &str) -> bool {
    let trimmed = line.trim();

    if trimmed.ends_with(';')
        || trimmed.ends_with('{')
        || trimmed.ends_with('}')
        || trimmed.ends_with(':')
    {
        return true;
    }

    if trimmed.contains("return ")
        || trimmed.contains("def ")
        || trimmed.contains("print(")
        || trimmed.contains("printf(")
        || trimmed.contains("System.out")
        || trimmed.contains("#include")
    {
        return true;
    }

    if trimmed.starts_with("import ")
        || trimmed.starts_with("from ")
        || trimmed.starts_with("public ")
        || trimmed.starts_with("int ")
        || trimmed.starts_with("void ")
        || trimmed.starts_with("for ")
        || trimmed.starts_with("while ")
        || trimmed.starts_with("//")
    {
        return true;
    }

    if trimmed.contains(" = ") || (trimmed.contains('(') && trimmed.contains(')')) {
        return true;
    }

    line.starts_with("    ") || line.starts_with('\t')
}

fn sniff_mime(image: &[u8]) -> &'static str {
    if image.starts_with(b"\x89PNG") {
        "image/png"
    } else if image.starts_with(b"\xFF\xD8\xFF") {
        "image/jpeg"
    } else if image.starts_with(b"GIF8") {
        "image/gif"
    } else if image.len() >= 12 && &image[0..4] == b"RIFF" && &image[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}
