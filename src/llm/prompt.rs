//! Prompt assembly for the tutoring model.
//!
//! The guardrails live here: the system prompt forbids complete solutions
//! and pins the JSON reply shape, and the user prompt hands the model
//! everything the local heuristics already know so it teaches from the same
//! findings the fallback path would.

use crate::analysis::{AnalysisRequest, ComplexityEstimate, DetectedError, Level};

/// Persona, guardrails, and the reply contract.
pub fn system_prompt(req: &AnalysisRequest) -> String {
    let register = match req.level {
        Level::Basic => {
            "The student is a beginner. Use everyday words, short sentences, and no jargon."
        }
        Level::Moderate => {
            "The student knows the basics. Use standard programming terms and connect new \
             ideas to ones they likely know."
        }
        Level::Complex => {
            "The student is advanced. Be precise and technical; name the underlying concepts \
             directly."
        }
    };

    format!(
        "You are a patient programming tutor helping a student learn by doing.\n\
         {register}\n\
         Rules you must never break:\n\
         1. NEVER write the complete corrected program or a full working function. \
            Tiny syntax fragments (one or two lines) are fine; whole solutions are not.\n\
         2. Guide with questions and small steps so the student does the fixing.\n\
         3. The student asked for hint directness {hint_level} on a 1-5 scale; \
            1 is a gentle nudge, 5 names the exact line and change.\n\
         4. Encourage: point out what the student got right before what went wrong.\n\
         Respond with a single JSON object and nothing else, using exactly these keys: \
         \"explanation\" (what is going on), \"hint\" (the next step, calibrated to the \
         hint level), \"analogy\" (an everyday comparison), \"reply\" (answer to the \
         student's question, only when one was asked), \"conceptsTaught\" (array of short \
         concept names), \"suggestedNextConcept\" (one short phrase).",
        hint_level = req.hint_level,
    )
}

/// The request body: code, what the heuristics found, and learning context.
pub fn user_prompt(
    req: &AnalysisRequest,
    errors: &[DetectedError],
    complexity: &ComplexityEstimate,
) -> String {
    let mut prompt = format!(
        "Language: {language}\nStudent level: {level:?}\nHint level: {hint} of 5\n\n\
         Student code:\n```{language}\n{code}\n```\n",
        language = req.language,
        level = req.level,
        hint = req.hint_level,
        code = req.code.trim_end(),
    );

    prompt.push_str("\nAutomated checks found:\n");
    if errors.is_empty() {
        prompt.push_str("- nothing flagged\n");
    } else {
        for err in errors {
            prompt.push_str(&format!("- [{}] {}\n", err.kind, err.description));
        }
    }

    prompt.push_str(&format!(
        "\nComplexity estimate: best {best}, average {average}, worst {worst}. {expl}\n",
        best = complexity.best,
        average = complexity.average,
        worst = complexity.worst,
        expl = complexity.explanation,
    ));

    if let Some(state) = &req.learning_state {
        let mut notes = Vec::new();
        if !state.struggling_concepts.is_empty() {
            notes.push(format!(
                "struggling with {}",
                state.struggling_concepts.join(", ")
            ));
        }
        if state.hints_given_this_session > 0 {
            notes.push(format!(
                "{} hints so far this session",
                state.hints_given_this_session
            ));
        }
        if state.same_error_repeated {
            notes.push("the same error kind just repeated".to_string());
        }
        if !notes.is_empty() {
            prompt.push_str(&format!("\nLearning context: {}.\n", notes.join("; ")));
        }
    }

    if let Some(question) = req.user_question.as_deref().map(str::trim) {
        if !question.is_empty() {
            prompt.push_str(&format!("\nStudent question: {question}\n"));
        }
    }

    prompt
}
