//! The heuristic error detector.
//!
//! Runs a fixed, ordered list of passes over the submitted code: common
//! checks first (brackets, typo table, infinite loops), then the rules for
//! the declared language. Results keep discovery order so the fallback
//! builder can treat the first entry as the one to teach from.
//!
//! Every pass is a regex or character-scan heuristic. Over- and
//! under-reporting are both expected; callers must present results as
//! advisory hints, never as compiler truth.

use super::brackets::check_bracket_balance;
use super::lang;
use super::loops::scan_infinite_loops;
use super::typos::scan_typos;
use super::{DetectedError, ErrorKind, Language, Severity};

type PassFn = fn(&str, Language) -> Vec<DetectedError>;

/// The detection pipeline, in the order the passes run.
///
/// Kept as a named table so tests can exercise one rule at a time and so
/// the order is visible in one place.
pub const PASSES: &[(&str, PassFn)] = &[
    ("bracket-balance", bracket_pass),
    ("typo-table", typo_pass),
    ("infinite-loop", loop_pass),
    ("language-rules", language_pass),
];

/// Run every pass over `code` and collect the findings in discovery order.
pub fn detect_errors(code: &str, language: Language) -> Vec<DetectedError> {
    PASSES
        .iter()
        .flat_map(|(_, pass)| pass(code, language))
        .collect()
}

fn bracket_pass(code: &str, _language: Language) -> Vec<DetectedError> {
    check_bracket_balance(code)
        .issues
        .into_iter()
        .map(|issue| DetectedError {
            kind: ErrorKind::Syntax,
            description: issue.message(),
            line: Some(issue.line),
            severity: Severity::Error,
        })
        .collect()
}

fn typo_pass(code: &str, _language: Language) -> Vec<DetectedError> {
    scan_typos(code)
}

fn loop_pass(code: &str, _language: Language) -> Vec<DetectedError> {
    scan_infinite_loops(code)
}

fn language_pass(code: &str, language: Language) -> Vec<DetectedError> {
    lang::scan(code, language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_order_is_stable() {
        let names: Vec<&str> = PASSES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "bracket-balance",
                "typo-table",
                "infinite-loop",
                "language-rules"
            ]
        );
    }

    #[test]
    fn clean_python_yields_nothing() {
        let code = "def double(x):\n    return x * 2\n";
        assert!(detect_errors(code, Language::Python).is_empty());
    }

    #[test]
    fn bracket_errors_come_before_language_errors() {
        // Unclosed paren plus a missing colon: both fire, brackets first.
        let code = "for i in range(10\n    print(i)\n";
        let errs = detect_errors(code, Language::Python);
        assert!(errs.len() >= 2, "got: {errs:?}");
        assert!(errs[0].description.contains("never closed"));
        assert_eq!(errs[0].kind, ErrorKind::Syntax);
    }

    #[test]
    fn missing_colon_scenario_reports_syntax() {
        let code = "for i in range(10)\n  print(i)\n";
        let errs = detect_errors(code, Language::Python);
        assert!(
            errs.iter()
                .any(|e| e.kind == ErrorKind::Syntax && e.description.contains(':')),
            "got: {errs:?}"
        );
    }

    #[test]
    fn pirnt_typo_is_reported_for_any_language() {
        for language in [Language::Python, Language::C, Language::Cpp, Language::Java] {
            let errs = detect_errors("pirnt\n", language);
            assert!(
                errs.iter()
                    .any(|e| e.kind == ErrorKind::Typo && e.description.contains("print")),
                "{language:?}: {errs:?}"
            );
        }
    }

    #[test]
    fn infinite_loop_without_break_is_flagged_in_c() {
        let code = "#include <stdio.h>\nint main() {\n    while (1) {\n        step();\n    }\n    return 0;\n}\n";
        let errs = detect_errors(code, Language::C);
        assert!(
            errs.iter().any(|e| e.kind == ErrorKind::Logic),
            "got: {errs:?}"
        );
    }
}
