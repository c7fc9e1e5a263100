//! Language-specific rule sets, run after the common detector stages.

pub mod c_family;
pub mod java;
pub mod python;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DetectedError, ErrorKind, Language, Severity};

/// Dispatch to the rule set for `language`.
pub fn scan(code: &str, language: Language) -> Vec<DetectedError> {
    match language {
        Language::Python => python::scan(code),
        Language::C | Language::Cpp => c_family::scan(code),
        Language::Java => java::scan(code),
    }
}

/// Characters that legitimately end a statement line in the brace languages.
const LINE_TERMINATORS: &[char] = &[';', '{', '}', ':', ','];

static OPERATOR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[=+\-*/%]").expect("operator token regex"));

/// Shared missing-semicolon heuristic for C, C++, and Java.
///
/// A line is suspicious when it contains an assignment or arithmetic
/// operator, is not a control-flow header, and does not end in one of the
/// accepted terminators. Declarations without operators slip through and
/// continuation lines can false-positive; the result is a warning, not an
/// error.
pub(super) fn scan_missing_semicolons(
    stripped: &str,
    header_keywords: &Regex,
) -> Vec<DetectedError> {
    let mut found = Vec::new();

    for (idx, raw_line) in stripped.lines().enumerate() {
        // Drop any trailing // comment before inspecting the line shape.
        let line = raw_line.split("//").next().unwrap_or(raw_line).trim_end();
        let trimmed = line.trim_start();

        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with('@')
            || trimmed.starts_with("/*")
            || trimmed.starts_with('*')
        {
            continue;
        }
        if header_keywords.is_match(trimmed) {
            continue;
        }
        if trimmed
            .chars()
            .last()
            .is_some_and(|c| LINE_TERMINATORS.contains(&c) || c == '\\')
        {
            continue;
        }
        if OPERATOR_TOKEN.is_match(trimmed) {
            found.push(DetectedError {
                kind: ErrorKind::Syntax,
                description: format!("Line {} may be missing a ';' at the end.", idx + 1),
                line: Some(idx as u32 + 1),
                severity: Severity::Warning,
            });
        }
    }

    found
}
