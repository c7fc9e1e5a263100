//! Big-O estimation from textual structure.
//!
//! Counts loop headers, measures loop nesting (brace scoping for C-family
//! code, indentation for Python), and looks for halving/doubling operators
//! and self-referencing function names. A fixed decision table turns those
//! signals into an estimate. This is a coarse static guess for teaching
//! purposes, not real asymptotic analysis, and it inherits every weakness
//! of text-level matching.

use once_cell::sync::Lazy;
use regex::Regex;

use super::literals::strip_string_literals;
use super::{ComplexityEstimate, Language};

static LOOP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:for|while)\b").expect("loop token regex"));

/// Tokens that drive the brace-scope walk: loop headers, braces, parens
/// and statement ends.
static DEPTH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:for|while)\b|[(){};]").expect("depth token regex"));

static PY_LOOP_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:for|while)\b").expect("python loop header regex"));

static HALVING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/=\s*2\b|/\s*2\b|>>=?\s*1\b").expect("halving regex"));

static DOUBLING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*=\s*2\b|\*\s*2\b|<<=?\s*1\b").expect("doubling regex"));

static PY_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdef\s+(\w+)\s*\(").expect("python def regex"));

/// A name directly before `(...)  {` looks like a C/C++/Java definition.
/// `for (a; b; c)` self-excludes because its header contains semicolons.
static BRACE_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\w+)\s*\([^;{}]*\)\s*\{").expect("brace def regex"));

const NOT_FUNCTION_NAMES: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "catch", "return", "sizeof", "new",
    "synchronized",
];

/// Estimate the time complexity of `code`.
///
/// The decision table runs top to bottom; the first matching row wins.
pub fn estimate_complexity(code: &str, language: Language) -> ComplexityEstimate {
    let stripped = strip_string_literals(code);

    let loop_count = LOOP_TOKEN.find_iter(&stripped).count();
    let depth = loop_nesting_depth(&stripped, language);
    let halving = HALVING.is_match(&stripped) || DOUBLING.is_match(&stripped);
    let recursive = has_recursion(&stripped, language);

    if loop_count == 0 && !halving && !recursive {
        return uniform(
            "O(1)",
            "No loops or recursion found, so the amount of work stays the same no matter how \
             big the input gets.",
        );
    }
    if halving && depth >= 2 {
        return uniform(
            "O(n log n)",
            "A halving (or doubling) step inside nested loop structure usually means \
             O(n log n), the shape of efficient sorts like merge sort.",
        );
    }
    if halving {
        return uniform(
            "O(log n)",
            "The working value is halved or doubled each step, so the number of steps grows \
             logarithmically, like binary search.",
        );
    }
    if depth >= 2 {
        let label = power_label(depth);
        return uniform(
            &label,
            &format!(
                "Found {depth} nested loops over the input, so the iteration counts multiply \
                 together."
            ),
        );
    }
    if loop_count > 0 {
        return uniform(
            "O(n)",
            "A single pass over the input: the work grows in step with the input size.",
        );
    }
    if recursive {
        return ComplexityEstimate {
            best: "O(n)".to_string(),
            worst: "O(2^n)".to_string(),
            average: "O(2^n)".to_string(),
            explanation: "Recursive calls with no loop structure can range from linear to \
                          exponential depending on how many times each call branches. Check \
                          how many recursive calls one call makes."
                .to_string(),
        };
    }

    ComplexityEstimate {
        best: "O(1)".to_string(),
        worst: "O(n)".to_string(),
        average: "O(n)".to_string(),
        explanation: "Unable to determine exact complexity from the code's structure."
            .to_string(),
    }
}

fn uniform(label: &str, explanation: &str) -> ComplexityEstimate {
    ComplexityEstimate {
        best: label.to_string(),
        worst: label.to_string(),
        average: label.to_string(),
        explanation: explanation.to_string(),
    }
}

fn power_label(depth: u32) -> String {
    match depth {
        2 => "O(n²)".to_string(),
        3 => "O(n³)".to_string(),
        d => format!("O(n^{d})"),
    }
}

fn loop_nesting_depth(stripped: &str, language: Language) -> u32 {
    if language.is_brace_language() {
        brace_loop_depth(stripped)
    } else {
        indent_loop_depth(stripped)
    }
}

/// Walk brace scopes, remembering how many loop headers each `{` absorbed.
/// `pending` covers headers whose body brace has not opened yet; a `;`
/// outside parentheses ends a braceless single-statement body.
fn brace_loop_depth(stripped: &str) -> u32 {
    let mut max = 0u32;
    let mut scopes: Vec<u32> = Vec::new();
    let mut active = 0u32;
    let mut pending = 0u32;
    let mut parens = 0u32;

    for token in DEPTH_TOKEN.find_iter(stripped) {
        match token.as_str() {
            "for" | "while" => {
                max = max.max(active + pending + 1);
                pending += 1;
            }
            "(" => parens += 1,
            ")" => parens = parens.saturating_sub(1),
            ";" if parens == 0 => pending = 0,
            "{" => {
                scopes.push(pending);
                active += pending;
                pending = 0;
            }
            "}" => {
                if let Some(absorbed) = scopes.pop() {
                    active = active.saturating_sub(absorbed);
                }
            }
            _ => {}
        }
    }

    max
}

/// Python nesting via indentation: a loop stays open until a line at the
/// same or smaller indent appears.
fn indent_loop_depth(stripped: &str) -> u32 {
    let mut max = 0u32;
    let mut stack: Vec<usize> = Vec::new();

    for line in stripped.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        let indent = line.len() - trimmed.len();
        while stack.last().is_some_and(|&open| open >= indent) {
            stack.pop();
        }
        if PY_LOOP_HEADER.is_match(line) {
            stack.push(indent);
            max = max.max(stack.len() as u32);
        }
    }

    max
}

/// A function counts as recursive when its name appears more than once as a
/// call-shaped reference. The definition site is one of those occurrences,
/// so any additional call trips this, which makes it a deliberately loose
/// signal.
fn has_recursion(stripped: &str, language: Language) -> bool {
    let names: Vec<String> = match language {
        Language::Python => PY_DEF
            .captures_iter(stripped)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect(),
        _ => BRACE_DEF
            .captures_iter(stripped)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .filter(|name| !NOT_FUNCTION_NAMES.contains(&name.as_str()))
            .collect(),
    };

    names.iter().any(|name| {
        Regex::new(&format!(r"\b{name}\s*\("))
            .map(|re| re.find_iter(stripped).count() > 1)
            .unwrap_or(false)
    })
}
