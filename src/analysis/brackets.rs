//! Bracket-balance scan, the first detector stage.
//!
//! A plain stack over `(` `[` `{` after string-literal stripping. Reports
//! three shapes of problem: a closer with nothing open, a closer that does
//! not match the innermost opener, and openers still unclosed at end of
//! input.

use super::literals::strip_string_literals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketIssueKind {
    /// A closer appeared while the stack was empty.
    UnexpectedCloser,
    /// A closer appeared that does not pair with the innermost opener.
    MismatchedCloser,
    /// An opener was never closed before end of input.
    UnclosedOpener,
}

/// One bracket problem, with enough context to word a useful message.
#[derive(Debug, Clone)]
pub struct BracketIssue {
    pub kind: BracketIssueKind,
    /// The character at fault (the closer found, or the opener left open).
    pub found: char,
    /// For mismatches: the closer that would have paired with the opener.
    pub expected: Option<char>,
    /// 1-based line of `found`.
    pub line: u32,
}

impl BracketIssue {
    /// Student-facing description of the problem.
    pub fn message(&self) -> String {
        match self.kind {
            BracketIssueKind::UnexpectedCloser => format!(
                "Unexpected '{}' on line {} — there is no matching opening bracket before it.",
                self.found, self.line
            ),
            BracketIssueKind::MismatchedCloser => format!(
                "Found '{}' on line {} but the innermost open bracket expects '{}'.",
                self.found,
                self.line,
                self.expected.unwrap_or('?')
            ),
            BracketIssueKind::UnclosedOpener => format!(
                "'{}' opened on line {} is never closed.",
                self.found, self.line
            ),
        }
    }
}

/// Result of a bracket scan. Balanced means no issues at all.
#[derive(Debug, Clone, Default)]
pub struct BracketReport {
    pub issues: Vec<BracketIssue>,
}

impl BracketReport {
    pub fn balanced(&self) -> bool {
        self.issues.is_empty()
    }
}

fn closer_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Scan `code` for bracket problems.
///
/// String-literal contents are stripped first so quoted brackets (a very
/// common student pattern in print statements) cannot trip the scan.
pub fn check_bracket_balance(code: &str) -> BracketReport {
    let stripped = strip_string_literals(code);
    let mut stack: Vec<(char, u32)> = Vec::new();
    let mut issues = Vec::new();
    let mut line: u32 = 1;

    for ch in stripped.chars() {
        match ch {
            '\n' => line += 1,
            '(' | '[' | '{' => stack.push((ch, line)),
            ')' | ']' | '}' => match stack.pop() {
                None => issues.push(BracketIssue {
                    kind: BracketIssueKind::UnexpectedCloser,
                    found: ch,
                    expected: None,
                    line,
                }),
                Some((opener, _)) if closer_for(opener) != ch => issues.push(BracketIssue {
                    kind: BracketIssueKind::MismatchedCloser,
                    found: ch,
                    expected: Some(closer_for(opener)),
                    line,
                }),
                Some(_) => {}
            },
            _ => {}
        }
    }

    for (opener, open_line) in stack {
        issues.push(BracketIssue {
            kind: BracketIssueKind::UnclosedOpener,
            found: opener,
            expected: None,
            line: open_line,
        });
    }

    BracketReport { issues }
}
