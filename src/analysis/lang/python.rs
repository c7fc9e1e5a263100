//! Python rule set.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::literals::strip_string_literals;
use crate::analysis::{DetectedError, ErrorKind, Severity};

static STATEMENT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:if|elif|else|for|while|def|class|try|except|finally|with)\b")
        .expect("statement header regex")
});

// `print` followed by something that is not an opening paren or an
// assignment, i.e. the Python 2 statement form.
static PRINT_WITHOUT_PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bprint\s+[^\s(=]"#).expect("print regex"));

// A lone `=` inside an `if`/`elif`/`while` head. The character class before
// the `=` rules out `==`, `!=`, `<=`, `>=` and the walrus `:=`.
static ASSIGNMENT_IN_CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:if|elif|while)\b[^:]*[^=!<>:]=[^=]").expect("condition regex")
});

pub fn scan(code: &str) -> Vec<DetectedError> {
    let stripped = strip_string_literals(code);
    let mut found = Vec::new();
    let mut saw_tab_indent = false;
    let mut saw_space_indent = false;

    for (idx, line) in stripped.lines().enumerate() {
        let line_no = idx as u32 + 1;

        if line.starts_with('\t') {
            saw_tab_indent = true;
        } else if line.starts_with(' ') && !line.trim().is_empty() {
            saw_space_indent = true;
        }

        // Everything from `#` on is comment; literals are already blanked,
        // so a `#` here is never inside a string.
        let line = line.split('#').next().unwrap_or(line).trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if STATEMENT_HEADER.is_match(line) && !line.ends_with(':') && !line.ends_with('\\') {
            found.push(DetectedError {
                kind: ErrorKind::Syntax,
                description: format!(
                    "Line {line_no} starts a block but does not end with ':'."
                ),
                line: Some(line_no),
                severity: Severity::Error,
            });
        }

        if PRINT_WITHOUT_PARENS.is_match(line) {
            found.push(DetectedError {
                kind: ErrorKind::Syntax,
                description: format!(
                    "Line {line_no}: print needs parentheses in Python 3 — print(...)."
                ),
                line: Some(line_no),
                severity: Severity::Error,
            });
        }

        if ASSIGNMENT_IN_CONDITION.is_match(line) {
            found.push(DetectedError {
                kind: ErrorKind::Logic,
                description: format!(
                    "Line {line_no}: a single '=' inside a condition assigns — use '==' to compare."
                ),
                line: Some(line_no),
                severity: Severity::Warning,
            });
        }
    }

    if saw_tab_indent && saw_space_indent {
        found.push(DetectedError {
            kind: ErrorKind::Style,
            description: "Indentation mixes tabs and spaces — pick one, Python treats them \
                          differently."
                .to_string(),
            line: None,
            severity: Severity::Warning,
        });
    }

    found
}
