//! Fallback response building.
//!
//! This is the path taken when no LLM is configured or the LLM call fails:
//! everything is synthesized locally from the detector output, the
//! complexity estimate, and canned teaching text. The same [`TutorReply`]
//! shape is what LLM replies are parsed into, so the rest of the pipeline
//! does not care which path produced it.

pub mod questions;
pub mod templates;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisRequest, ComplexityEstimate, DetectedError};
use crate::learning::{concept_for, LearningState};

/// The teaching payload of an `/analyze` response.
///
/// `analogy` is set on the error-teaching path, `reply` on the free-text
/// question path; the two are never both present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorReply {
    pub explanation: String,
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analogy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default)]
    pub concepts_taught: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_next_concept: Option<String>,
}

/// Build the heuristic-only reply for a request.
///
/// Precedence: a free-text question wins; otherwise teach from the first
/// detected error; otherwise encourage. The hint is always the raw
/// progression entry for the request's hint level, never flavored, so hint
/// wording stays stable across sessions.
pub fn build_fallback(
    req: &AnalysisRequest,
    errors: &[DetectedError],
    complexity: &ComplexityEstimate,
) -> TutorReply {
    let state = req.learning_state.clone().unwrap_or_default();

    let question = req
        .user_question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    if let Some(question) = question {
        return question_reply(question, req, errors, complexity, &state);
    }

    match errors.first() {
        Some(first) => error_reply(first, req, &state),
        None => encouraging_reply(req, complexity),
    }
}

fn question_reply(
    question: &str,
    req: &AnalysisRequest,
    errors: &[DetectedError],
    complexity: &ComplexityEstimate,
    state: &LearningState,
) -> TutorReply {
    let answer = questions::answer_question(question, errors, complexity, req.hint_level, state);

    // Even on the question path, surface the top detector finding so the
    // student is not answered in a vacuum.
    let explanation = match errors.first() {
        Some(first) => format!("While reading your code I also noticed: {}", first.description),
        None => "Your code looks reasonable at a glance; ask me to analyze it any time.".to_string(),
    };

    let hint = match errors.first() {
        Some(first) => templates::hint_for_error(first.kind, req.hint_level),
        None => templates::generic_hint(req.hint_level),
    };

    TutorReply {
        explanation,
        hint: hint.to_string(),
        analogy: None,
        reply: Some(answer),
        concepts_taught: errors
            .first()
            .map(|e| vec![concept_for(e.kind).to_string()])
            .unwrap_or_default(),
        suggested_next_concept: Some(templates::next_concept(req.level).to_string()),
    }
}

fn error_reply(first: &DetectedError, req: &AnalysisRequest, state: &LearningState) -> TutorReply {
    let template = templates::template_for(first.kind, req.level);
    let concept = concept_for(first.kind);

    let mut explanation = format!("{}\n\n{}", first.description, template.explanation);
    if state.same_error_repeated {
        explanation.push_str(
            "\n\nWe've hit this kind of error before in this session. Slowing down on it now \
             will save you time later.",
        );
    } else if state.struggling_concepts.iter().any(|c| c == concept) {
        explanation.push_str(&format!(
            "\n\nYou've wrestled with {concept} before, so you already know more about fixing \
             it than last time."
        ));
    }

    TutorReply {
        explanation,
        hint: templates::hint_for_error(first.kind, req.hint_level).to_string(),
        analogy: Some(template.analogy.to_string()),
        reply: None,
        concepts_taught: vec![concept.to_string()],
        suggested_next_concept: Some(templates::next_concept(req.level).to_string()),
    }
}

fn encouraging_reply(req: &AnalysisRequest, complexity: &ComplexityEstimate) -> TutorReply {
    TutorReply {
        explanation: format!(
            "I read through your code and didn't find anything obviously broken. Nice work. \
             Time-wise it looks like {} in the worst case.",
            complexity.worst
        ),
        hint: templates::generic_hint(req.hint_level).to_string(),
        analogy: None,
        reply: None,
        concepts_taught: Vec::new(),
        suggested_next_concept: Some(templates::next_concept(req.level).to_string()),
    }
}
