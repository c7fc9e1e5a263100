//! C and C++ rule set. The two share every check; only the include headers
//! differ, and none of the heuristics look inside them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::literals::strip_string_literals;
use crate::analysis::{DetectedError, ErrorKind, Severity};

use super::scan_missing_semicolons;

static CONTROL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:if|else|for|while|do|switch|case|default|struct|class|enum|union|namespace|template|typedef|using|public|private|protected|extern)\b",
    )
    .expect("control header regex")
});

// `if (x = 1)` / `while (n = read())`: assignment where a comparison was
// almost certainly intended.
static ASSIGNMENT_IN_CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:if|while)\s*\([^)]*[^=!<>]=[^=][^)]*\)").expect("condition regex")
});

// Fixed-size array declarations: `int arr[10]`, `char buf [256]`, ...
static ARRAY_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:int|char|float|double|long|short|unsigned|signed|bool|size_t)\s+(\w+)\s*\[\s*(\d+)\s*\]",
    )
    .expect("array decl regex")
});

static MAIN_FN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmain\s*\(").expect("main regex"));

pub fn scan(code: &str) -> Vec<DetectedError> {
    let stripped = strip_string_literals(code);
    let mut found = scan_missing_semicolons(&stripped, &CONTROL_HEADER);

    for (idx, line) in stripped.lines().enumerate() {
        if ASSIGNMENT_IN_CONDITION.is_match(line) {
            found.push(DetectedError {
                kind: ErrorKind::Logic,
                description: format!(
                    "Line {}: '=' inside the condition assigns a value — use '==' to compare.",
                    idx + 1
                ),
                line: Some(idx as u32 + 1),
                severity: Severity::Warning,
            });
        }
    }

    found.extend(scan_array_bounds(&stripped));

    if !MAIN_FN.is_match(&stripped) && !stripped.contains("#include") && code.len() > 50 {
        found.push(DetectedError {
            kind: ErrorKind::Structure,
            description: "No main() function found — a C/C++ program needs one entry point."
                .to_string(),
            line: None,
            severity: Severity::Info,
        });
    }

    found
}

/// Off-by-one heuristic: accessing `arr[size]` after `type arr[size]` reads
/// one element past the end. Only exact-literal index matches are flagged.
fn scan_array_bounds(stripped: &str) -> Vec<DetectedError> {
    let mut found = Vec::new();

    for decl in ARRAY_DECL.captures_iter(stripped) {
        let name = &decl[1];
        let size = &decl[2];
        let decl_range = decl.get(0).map(|m| m.range());

        let access = match Regex::new(&format!(r"\b{name}\s*\[\s*{size}\s*\]")) {
            Ok(re) => re,
            Err(_) => continue,
        };
        for m in access.find_iter(stripped) {
            // The declaration itself matches the access pattern; skip it.
            if decl_range.as_ref().is_some_and(|r| r.contains(&m.start())) {
                continue;
            }
            let line = stripped[..m.start()].matches('\n').count() as u32 + 1;
            let last = size.parse::<u64>().map(|n| n.saturating_sub(1)).unwrap_or(0);
            found.push(DetectedError {
                kind: ErrorKind::Logic,
                description: format!(
                    "{name}[{size}] on line {line} reads past the end — the last valid index \
                     of '{name}' is {last}."
                ),
                line: Some(line),
                severity: Severity::Error,
            });
        }
    }

    found
}
