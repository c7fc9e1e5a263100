//! Free-text question routing.
//!
//! A contains-match keyword router, checked in a fixed order. It is
//! intentionally naive ("doesn't" routes to the explain topic because it
//! contains "does"); the canned answers are written to read sensibly even
//! when the routing is approximate.

use crate::analysis::{ComplexityEstimate, DetectedError, ErrorKind};
use crate::learning::LearningState;

use super::templates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Analyze,
    Explain,
    Hint,
    Logic,
    General,
}

/// Routing table, first hit wins. Order matters: "what's wrong" must land on
/// `Analyze` even though it also contains an `Explain` keyword.
static KEYWORD_ROUTES: &[(&[&str], Topic)] = &[
    (&["analyze", "issue", "wrong"], Topic::Analyze),
    (&["explain", "what", "does"], Topic::Explain),
    (&["hint"], Topic::Hint),
    (&["logic"], Topic::Logic),
];

pub fn classify(question: &str) -> Topic {
    let lowered = question.to_lowercase();
    KEYWORD_ROUTES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, topic)| *topic)
        .unwrap_or(Topic::General)
}

/// Produce the canned answer for a free-text question, flavored with what we
/// know about the student.
pub fn answer_question(
    question: &str,
    errors: &[DetectedError],
    complexity: &ComplexityEstimate,
    hint_level: u8,
    state: &LearningState,
) -> String {
    let mut answer = match classify(question) {
        Topic::Analyze => analyze_answer(errors, complexity),
        Topic::Explain => explain_answer(complexity),
        Topic::Hint => hint_answer(errors, hint_level),
        Topic::Logic => logic_answer(errors),
        Topic::General => {
            "I can analyze your code for problems, explain what it does, or give you a hint. \
             Ask for one of those, or run the code and bring me the error message."
                .to_string()
        }
    };

    if let Some(note) = personal_note(state) {
        answer.push(' ');
        answer.push_str(&note);
    }
    answer
}

fn analyze_answer(errors: &[DetectedError], complexity: &ComplexityEstimate) -> String {
    match errors.first() {
        Some(first) => {
            let mut text = format!(
                "I looked over your code. The first thing to check: {}",
                first.description
            );
            if errors.len() > 1 {
                text.push_str(&format!(
                    " I spotted {} things worth a look in total; start with this one.",
                    errors.len()
                ));
            }
            text
        }
        None => format!(
            "I looked over your code and nothing jumped out as broken. Time-wise it looks \
             like {} in the worst case. If it still misbehaves, tell me what you expected it \
             to do.",
            complexity.worst
        ),
    }
}

fn explain_answer(complexity: &ComplexityEstimate) -> String {
    format!(
        "Here's the shape of what your code does. {} Try walking through it with one small \
         example input and saying each line's job out loud.",
        complexity.explanation
    )
}

fn hint_answer(errors: &[DetectedError], hint_level: u8) -> String {
    match errors.first() {
        Some(first) => templates::hint_for_error(first.kind, hint_level).to_string(),
        None => templates::generic_hint(hint_level).to_string(),
    }
}

fn logic_answer(errors: &[DetectedError]) -> String {
    let logic_issue = errors.iter().find(|e| e.kind == ErrorKind::Logic);
    match logic_issue {
        Some(issue) => format!(
            "Let's focus on the logic. {} Trace the variable values by hand through that \
             part and check each condition against what you intended.",
            issue.description
        ),
        None => "Pick one concrete input and follow it through every branch by hand, writing \
                 down each variable as it changes. Logic bugs hide where your mental model \
                 and the code disagree."
            .to_string(),
    }
}

fn personal_note(state: &LearningState) -> Option<String> {
    if let Some(concept) = state.struggling_concepts.last() {
        return Some(format!(
            "I know {concept} has been tricky lately; that's normal, and it gets easier \
             with practice."
        ));
    }
    if state.hints_given_this_session >= 3 {
        return Some(format!(
            "That's {} hints this session, so let's make this one count.",
            state.hints_given_this_session
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Severity;

    fn estimate() -> ComplexityEstimate {
        ComplexityEstimate {
            best: "O(1)".to_string(),
            worst: "O(n)".to_string(),
            average: "O(n)".to_string(),
            explanation: "A single pass over the input.".to_string(),
        }
    }

    fn syntax_error() -> DetectedError {
        DetectedError {
            kind: ErrorKind::Syntax,
            description: "Line 1: missing ':'".to_string(),
            line: Some(1),
            severity: Severity::Error,
        }
    }

    #[test]
    fn whats_wrong_routes_to_analyze() {
        assert_eq!(classify("What's wrong with my code?"), Topic::Analyze);
    }

    #[test]
    fn what_does_routes_to_explain() {
        assert_eq!(classify("what does this loop do"), Topic::Explain);
    }

    #[test]
    fn hint_requests_route_to_hint() {
        assert_eq!(classify("give me a hint please"), Topic::Hint);
    }

    #[test]
    fn logic_questions_route_to_logic() {
        assert_eq!(classify("is my logic right"), Topic::Logic);
    }

    #[test]
    fn anything_else_routes_to_general() {
        assert_eq!(classify("hello there"), Topic::General);
    }

    #[test]
    fn analyze_answer_leads_with_the_first_error() {
        let answer = answer_question(
            "what's wrong?",
            &[syntax_error()],
            &estimate(),
            1,
            &LearningState::default(),
        );
        assert!(answer.contains("missing ':'"));
    }

    #[test]
    fn hint_answer_respects_the_progression() {
        let answer = answer_question(
            "hint",
            &[syntax_error()],
            &estimate(),
            5,
            &LearningState::default(),
        );
        assert_eq!(answer, templates::SYNTAX_HINTS[4]);
    }

    #[test]
    fn struggling_concepts_flavor_the_answer() {
        let state = LearningState {
            struggling_concepts: vec!["syntax details".to_string()],
            ..LearningState::default()
        };
        let answer = answer_question("explain this", &[], &estimate(), 1, &state);
        assert!(answer.contains("syntax details"));
    }

    #[test]
    fn heavy_hint_use_is_acknowledged() {
        let state = LearningState {
            hints_given_this_session: 4,
            ..LearningState::default()
        };
        let answer = answer_question("hint", &[], &estimate(), 1, &state);
        assert!(answer.contains("4 hints"));
    }
}
