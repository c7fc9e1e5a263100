//! Known-misspelling table.
//!
//! A fixed misspelling → correction map matched with word boundaries,
//! case-insensitively, anywhere in the code. Entries are the classic
//! beginner transpositions from submitted exercises; none of them is a
//! real English word, so ordinary identifiers cannot match.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DetectedError, ErrorKind, Severity};

/// (misspelling, intended word). Order is the report order within a line.
const TYPO_TABLE: &[(&str, &str)] = &[
    ("pirnt", "print"),
    ("pritn", "print"),
    ("prnt", "print"),
    ("retrun", "return"),
    ("reutrn", "return"),
    ("fucntion", "function"),
    ("funtion", "function"),
    ("lenght", "length"),
    ("whiel", "while"),
    ("wihle", "while"),
    ("improt", "import"),
    ("imoprt", "import"),
    ("flase", "false"),
    ("ture", "true"),
    ("esle", "else"),
    ("breka", "break"),
    ("contiune", "continue"),
    ("pubilc", "public"),
    ("vodi", "void"),
    ("mian", "main"),
];

static TYPO_PATTERNS: Lazy<Vec<(Regex, &'static str, &'static str)>> = Lazy::new(|| {
    TYPO_TABLE
        .iter()
        .map(|&(typo, fix)| {
            let re = Regex::new(&format!(r"(?i)\b{typo}\b")).expect("typo regex");
            (re, typo, fix)
        })
        .collect()
});

/// Scan for known misspellings. One warning per (line, table entry) match.
pub fn scan_typos(code: &str) -> Vec<DetectedError> {
    let mut found = Vec::new();

    for (idx, line) in code.lines().enumerate() {
        for (re, typo, fix) in TYPO_PATTERNS.iter() {
            if re.is_match(line) {
                found.push(DetectedError {
                    kind: ErrorKind::Typo,
                    description: format!(
                        "'{typo}' looks like a typo — did you mean '{fix}'?"
                    ),
                    line: Some(idx as u32 + 1),
                    severity: Severity::Warning,
                });
            }
        }
    }

    found
}
