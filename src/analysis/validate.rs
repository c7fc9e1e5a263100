//! Request validation for `/analyze`.
//!
//! Works on the raw JSON value rather than a typed struct so every field
//! problem can be reported in one pass with a stable message. Never panics
//! and never mutates the input.

use serde_json::Value;

use super::{Language, Level};

pub const HINT_LEVEL_MIN: i64 = 1;
pub const HINT_LEVEL_MAX: i64 = 5;

/// Outcome of validating a raw `/analyze` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check the raw body for the four required fields.
///
/// `hintLevel` is required here; the route fills in its default before
/// calling this, so clients may still omit it.
pub fn validate_analyze_request(raw: &Value) -> Validation {
    let mut errors = Vec::new();

    match raw.get("code") {
        Some(Value::String(code)) if !code.trim().is_empty() => {}
        _ => errors.push("code is required and must be a non-empty string".to_string()),
    }

    match raw.get("language") {
        Some(Value::String(language)) if Language::parse(language).is_some() => {}
        _ => errors.push(format!(
            "language is required and must be one of: {}",
            Language::ALLOWED.join(", ")
        )),
    }

    match raw.get("level") {
        Some(Value::String(level)) if Level::parse(level).is_some() => {}
        _ => errors.push(format!(
            "level is required and must be one of: {}",
            Level::ALLOWED.join(", ")
        )),
    }

    if !hint_level_ok(raw.get("hintLevel")) {
        errors.push(format!(
            "hintLevel must be an integer between {HINT_LEVEL_MIN} and {HINT_LEVEL_MAX}"
        ));
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Extract a hint level from JSON integers or integer-shaped strings.
/// The route uses this to normalize the field before typed deserialization.
pub fn parse_hint_level(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn hint_level_ok(value: Option<&Value>) -> bool {
    parse_hint_level(value).is_some_and(|n| (HINT_LEVEL_MIN..=HINT_LEVEL_MAX).contains(&n))
}
