//! Java rule set.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::literals::strip_string_literals;
use crate::analysis::{DetectedError, ErrorKind, Severity};

use super::scan_missing_semicolons;

static CONTROL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:if|else|for|while|do|switch|case|default|class|interface|enum|package|import|try|catch|finally|synchronized|public|private|protected|static|abstract|final)\b",
    )
    .expect("control header regex")
});

// A String literal on either side of `==`. Works on literal-stripped text
// because the quote characters survive the stripping.
static LITERAL_EQ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"\s*==|==\s*"[^"]*""#).expect("literal eq regex"));

static STRING_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bString\s+(\w+)").expect("string decl regex"));

static MAIN_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"public\s+static\s+void\s+main\s*\(").expect("main signature regex")
});

static CLASS_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\b").expect("class keyword regex"));

pub fn scan(code: &str) -> Vec<DetectedError> {
    let stripped = strip_string_literals(code);
    let mut found = scan_string_equality(&stripped);

    found.extend(scan_missing_semicolons(&stripped, &CONTROL_HEADER));

    if !CLASS_KEYWORD.is_match(&stripped) {
        found.push(DetectedError {
            kind: ErrorKind::Structure,
            description: "No class declaration found — Java code lives inside a class."
                .to_string(),
            line: None,
            severity: Severity::Info,
        });
    } else if !MAIN_SIGNATURE.is_match(&stripped) {
        found.push(DetectedError {
            kind: ErrorKind::Structure,
            description: "No 'public static void main(String[] args)' found — the program \
                          has no entry point."
                .to_string(),
            line: None,
            severity: Severity::Info,
        });
    }

    found
}

/// `==` compares object references in Java. Flag comparisons that involve a
/// string literal or a variable declared as `String`.
fn scan_string_equality(stripped: &str) -> Vec<DetectedError> {
    let mut found = Vec::new();

    // One compiled pattern per declared String variable, built up front.
    let declared: Vec<Regex> = STRING_DECL
        .captures_iter(stripped)
        .filter_map(|cap| cap.get(1))
        .filter_map(|name| {
            let name = name.as_str();
            Regex::new(&format!(r"\b{name}\s*==|==\s*{name}\b")).ok()
        })
        .collect();

    for (idx, line) in stripped.lines().enumerate() {
        let literal_hit = LITERAL_EQ.is_match(line);
        let variable_hit = declared.iter().any(|re| re.is_match(line));
        if literal_hit || variable_hit {
            found.push(DetectedError {
                kind: ErrorKind::Logic,
                description: format!(
                    "Line {}: '==' compares String references, not contents — use .equals().",
                    idx + 1
                ),
                line: Some(idx as u32 + 1),
                severity: Severity::Error,
            });
        }
    }

    found
}
