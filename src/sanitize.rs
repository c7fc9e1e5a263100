//! Solution redaction for tutor replies.
//!
//! Short syntax examples are pedagogically useful and pass through
//! untouched. What gets removed is the shape of a complete solution: a
//! function signature followed by a substantial body, or an oversized
//! brace-delimited block. When any such shape appears anywhere in a reply,
//! every fenced code block in that reply is replaced with a placeholder.
//!
//! This is a coarse, best-effort filter. A reply can smuggle a solution
//! through several small snippets under the thresholds; the filter trades
//! that risk for never mangling legitimate teaching examples.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tutor::TutorReply;

/// What a redacted code block is replaced with.
pub const SOLUTION_PLACEHOLDER: &str = "[solution removed — try writing it yourself]";

/// Consecutive substantive body lines that make a snippet "a solution".
const SOLUTION_BODY_LINES: usize = 5;

/// Brace-body size (bytes between a `{` and its `}`) that makes a snippet
/// "a solution" regardless of line count.
const BRACE_BODY_LIMIT: usize = 200;

// ─── Pattern registry ─────────────────────────────────────────────────────────

/// Function-opening shapes, one per language family we teach.
static FUNCTION_SIGNATURES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?m)^[ \t]*def\s+\w+\s*\([^)]*\)\s*:").expect("regex: python def"),
        Regex::new(r"(?m)^[ \t]*function\s+\w+\s*\([^)]*\)\s*\{").expect("regex: function"),
        Regex::new(r"(?m)^[ \t]*(?:[\w:<>\[\]]+\s+)+\w+\s*\([^)]*\)\s*\{")
            .expect("regex: c-style signature"),
    ]
});

/// A complete fenced code block, info string included.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[^`\n]*\n.*?```").expect("regex: fenced block"));

// ─── Public API ───────────────────────────────────────────────────────────────

/// Sanitize free text.
///
/// Returns `(sanitized, was_redacted)`. Idempotent: redaction removes every
/// fenced block, so a second pass finds nothing left to replace.
pub fn sanitize_text(input: &str) -> (String, bool) {
    if !has_solution_shape(input) || !FENCED_BLOCK.is_match(input) {
        return (input.to_string(), false);
    }
    (strip_fences(input), true)
}

/// Sanitize every text field of a reply.
///
/// The trigger check runs over the fields joined together: a solution shape
/// in one field redacts the fenced blocks in all of them.
pub fn sanitize_reply(mut reply: TutorReply) -> TutorReply {
    let mut joined = String::new();
    for part in [
        Some(&reply.explanation),
        Some(&reply.hint),
        reply.analogy.as_ref(),
        reply.reply.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        joined.push_str(part);
        joined.push('\n');
    }

    if !has_solution_shape(&joined) {
        return reply;
    }

    reply.explanation = strip_fences(&reply.explanation);
    reply.hint = strip_fences(&reply.hint);
    reply.analogy = reply.analogy.map(|text| strip_fences(&text));
    reply.reply = reply.reply.map(|text| strip_fences(&text));
    reply
}

fn strip_fences(text: &str) -> String {
    FENCED_BLOCK
        .replace_all(text, SOLUTION_PLACEHOLDER)
        .to_string()
}

// ─── Solution-shape detection ─────────────────────────────────────────────────

fn has_solution_shape(text: &str) -> bool {
    signature_with_long_body(text) || oversized_brace_body(text)
}

/// A signature counts when the lines directly below it form a run of at
/// least [`SOLUTION_BODY_LINES`] substantive lines. The run stops at the
/// first blank, comment, fence, or punctuation-only line, so prose after a
/// short fenced example never pads the count.
fn signature_with_long_body(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();

    for pattern in FUNCTION_SIGNATURES.iter() {
        for m in pattern.find_iter(text) {
            let signature_ends_on = text[..m.end()].matches('\n').count();
            let body = lines.iter().skip(signature_ends_on + 1);

            let run = body.take_while(|line| is_substantive(line)).count();
            if run >= SOLUTION_BODY_LINES {
                return true;
            }
        }
    }
    false
}

fn is_substantive(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 3
        && !t.starts_with('#')
        && !t.starts_with("//")
        && !t.starts_with("```")
        && t.chars().any(|c| c.is_alphanumeric())
}

/// Any `{ ... }` pair whose span exceeds [`BRACE_BODY_LIMIT`] bytes.
fn oversized_brace_body(text: &str) -> bool {
    let mut stack: Vec<usize> = Vec::new();
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => stack.push(idx),
            '}' => {
                if let Some(open) = stack.pop() {
                    if idx - open > BRACE_BODY_LIMIT {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }
    false
}
