//! Infinite-loop lookahead.
//!
//! Flags `while (true)` / `while True:` style loops with no `break` token in
//! view. The lookahead window is a fixed number of lines; a `break` further
//! down, or an exit via `return`, still trips the warning. Results are
//! advisory.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DetectedError, ErrorKind, Severity};

/// How many lines below the loop header are searched for a `break`.
const BREAK_LOOKAHEAD_LINES: usize = 10;

static ALWAYS_TRUE_LOOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"while\s*\(\s*(?:true|True|1)\s*\)|while\s+(?:True|1)\s*:")
        .expect("always-true loop regex")
});

static BREAK_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bbreak\b").expect("break token regex"));

/// One warning per always-true loop header without a nearby `break`.
pub fn scan_infinite_loops(code: &str) -> Vec<DetectedError> {
    let lines: Vec<&str> = code.lines().collect();
    let mut found = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if !ALWAYS_TRUE_LOOP.is_match(line) {
            continue;
        }
        let end = (idx + 1 + BREAK_LOOKAHEAD_LINES).min(lines.len());
        let has_break = lines[idx..end].iter().any(|l| BREAK_TOKEN.is_match(l));
        if !has_break {
            found.push(DetectedError {
                kind: ErrorKind::Logic,
                description: format!(
                    "The loop on line {} runs forever: its condition is always true and \
                     no 'break' appears within the next {} lines.",
                    idx + 1,
                    BREAK_LOOKAHEAD_LINES
                ),
                line: Some(idx as u32 + 1),
                severity: Severity::Warning,
            });
        }
    }

    found
}
