//! The per-student learning state.
//!
//! The record is owned by the client and round-tripped on every `/analyze`
//! call; the server never stores it. [`LearningState::absorb`] is the one
//! place it changes: a pure value-in/value-out update applied after each
//! analysis, whose result is returned to the client for persisting.

use serde::{Deserialize, Serialize};

use crate::analysis::{DetectedError, ErrorKind};

/// Bounded history sizes. Oldest entries are evicted first (plain FIFO).
pub const MAX_PREVIOUS_EXPLANATIONS: usize = 5;
pub const MAX_ERROR_HISTORY: usize = 10;

/// Sessions with this many hints and still-failing analyses read as struggling.
const STRUGGLING_HINT_THRESHOLD: u32 = 6;

/// Coarse read on how the student is doing, derived on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Understanding {
    Struggling,
    #[default]
    Learning,
    Confident,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningState {
    /// Concepts the student keeps tripping over. Insert-once, order kept.
    pub struggling_concepts: Vec<String>,
    /// Concepts the student has shown they can apply cleanly.
    pub mastered_concepts: Vec<String>,
    pub hints_given_this_session: u32,
    /// True when the most recent two analyses led with the same error kind.
    pub same_error_repeated: bool,
    /// Explanations already shown, newest last.
    pub previous_explanations: Vec<String>,
    /// Kind name of the last analysis' leading error.
    pub last_error_type: Option<String>,
    pub current_understanding: Understanding,
    /// Kind names of leading errors, newest last.
    pub error_history: Vec<String>,
}

impl LearningState {
    /// Fold one analysis outcome into the state.
    ///
    /// `errors` is the detector output in discovery order; the first entry is
    /// the one the response taught from. `explanation` is the explanation
    /// text that was served.
    pub fn absorb(mut self, errors: &[DetectedError], explanation: &str) -> Self {
        push_bounded(
            &mut self.previous_explanations,
            explanation.to_string(),
            MAX_PREVIOUS_EXPLANATIONS,
        );
        self.hints_given_this_session = self.hints_given_this_session.saturating_add(1);

        match errors.first() {
            Some(first) => {
                let kind = first.kind.to_string();
                self.same_error_repeated =
                    self.error_history.last().is_some_and(|last| *last == kind);
                push_bounded(&mut self.error_history, kind.clone(), MAX_ERROR_HISTORY);
                if self.same_error_repeated {
                    let concept = concept_for(first.kind);
                    if !self.struggling_concepts.iter().any(|c| c == concept) {
                        self.struggling_concepts.push(concept.to_string());
                    }
                }
                self.last_error_type = Some(kind);
            }
            None => {
                self.same_error_repeated = false;
                // A clean run after struggling with a concept counts as
                // mastering it.
                if let Some(last) = self.last_error_type.take() {
                    if let Some(concept) = concept_for_name(&last) {
                        if let Some(pos) =
                            self.struggling_concepts.iter().position(|c| c == concept)
                        {
                            self.struggling_concepts.remove(pos);
                            if !self.mastered_concepts.iter().any(|c| c == concept) {
                                self.mastered_concepts.push(concept.to_string());
                            }
                        }
                    }
                }
            }
        }

        self.current_understanding = if self.same_error_repeated {
            Understanding::Struggling
        } else if errors.is_empty() {
            Understanding::Confident
        } else if self.hints_given_this_session >= STRUGGLING_HINT_THRESHOLD {
            Understanding::Struggling
        } else {
            Understanding::Learning
        };

        self
    }

    /// Start-of-session reset: clears counters and histories, keeps what the
    /// student knows (mastered and still-struggling concepts).
    pub fn reset_session(mut self) -> Self {
        self.hints_given_this_session = 0;
        self.same_error_repeated = false;
        self.previous_explanations.clear();
        self.error_history.clear();
        self.last_error_type = None;
        self.current_understanding = Understanding::Learning;
        self
    }
}

/// The concept a student practices when fixing errors of `kind`.
pub fn concept_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Syntax => "syntax details",
        ErrorKind::Logic => "logic flow",
        ErrorKind::Typo => "careful proofreading",
        ErrorKind::Structure => "program structure",
        ErrorKind::Style => "consistent formatting",
    }
}

fn concept_for_name(kind_name: &str) -> Option<&'static str> {
    match kind_name {
        "syntax" => Some(concept_for(ErrorKind::Syntax)),
        "logic" => Some(concept_for(ErrorKind::Logic)),
        "typo" => Some(concept_for(ErrorKind::Typo)),
        "structure" => Some(concept_for(ErrorKind::Structure)),
        "style" => Some(concept_for(ErrorKind::Style)),
        _ => None,
    }
}

fn push_bounded(list: &mut Vec<String>, item: String, cap: usize) {
    list.push(item);
    while list.len() > cap {
        list.remove(0);
    }
}
