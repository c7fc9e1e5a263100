//! Shared types for the heuristic code-analysis pipeline.
//!
//! Everything here crosses the HTTP boundary, so field and variant names are
//! pinned by `serde` attributes — the browser client depends on them.

pub mod brackets;
pub mod complexity;
pub mod detector;
pub mod lang;
pub mod literals;
pub mod loops;
pub mod typos;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::learning::LearningState;

// ─── Language / level enums ───────────────────────────────────────────────────

/// Source language of the submitted code. Drives which rule set runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Cpp,
    Java,
}

impl Language {
    /// Parse a user-supplied language name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Some(Self::Python),
            "c" => Some(Self::C),
            "cpp" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Names accepted by [`Language::parse`], for validation messages.
    pub const ALLOWED: &'static [&'static str] = &["python", "c", "cpp", "java"];

    /// True for languages that delimit blocks with `{` / `}`.
    pub fn is_brace_language(self) -> bool {
        !matches!(self, Self::Python)
    }

    /// Guess the language of arbitrary code text (used for OCR-extracted
    /// snippets where the client could not tell us). Coarse, first match wins.
    pub fn guess(code: &str) -> Self {
        if code.contains("#include") {
            return Self::Cpp;
        }
        if code.contains("public class") || code.contains("System.out.println") {
            return Self::Java;
        }
        if code.contains("def ") || code.contains("print(") || code.contains("import ") {
            return Self::Python;
        }
        if code.contains("printf(") || code.contains("int main") {
            return Self::C;
        }
        Self::Python
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Python => "python",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
        };
        f.write_str(s)
    }
}

/// Student skill level chosen in the editor. Selects the explanation register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Basic,
    Moderate,
    Complex,
}

impl Level {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "moderate" => Some(Self::Moderate),
            "complex" => Some(Self::Complex),
            _ => None,
        }
    }

    pub const ALLOWED: &'static [&'static str] = &["basic", "moderate", "complex"];
}

// ─── Detected errors ──────────────────────────────────────────────────────────

/// Category of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Syntax,
    Logic,
    Typo,
    Structure,
    Style,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Syntax => "syntax",
            Self::Logic => "logic",
            Self::Typo => "typo",
            Self::Structure => "structure",
            Self::Style => "style",
        };
        f.write_str(s)
    }
}

/// How seriously the caller should take a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One issue flagged by the heuristic detector.
///
/// These are advisory hints, not linter ground truth — every check is a
/// line- or whole-text regex heuristic that can both over- and under-report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedError {
    /// Issue category.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Human-readable description shown to the student.
    pub description: String,
    /// 1-based source line, when a single line can be blamed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub severity: Severity,
}

// ─── Complexity estimate ──────────────────────────────────────────────────────

/// Coarse Big-O guess derived from textual loop/recursion patterns.
///
/// This is not asymptotic analysis — it counts `for`/`while` tokens, looks
/// for halving/doubling operators, and sniffs for self-referencing function
/// names. Treat the labels as conversation starters for students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityEstimate {
    pub best: String,
    pub worst: String,
    pub average: String,
    pub explanation: String,
}

// ─── Analysis request ─────────────────────────────────────────────────────────

/// A validated `/analyze` request. Constructed once per HTTP call, never
/// mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// The student's source code, verbatim.
    pub code: String,
    pub language: Language,
    pub level: Level,
    /// 1 = gentlest nudge, 5 = most direct hint. The route defaults this to 1
    /// before validation when the client omits it.
    pub hint_level: u8,
    /// Free-text question typed into the chat box, if any.
    #[serde(default)]
    pub user_question: Option<String>,
    /// Client-held personalization record, round-tripped on every call.
    #[serde(default)]
    pub learning_state: Option<LearningState>,
}
