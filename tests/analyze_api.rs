//! End-to-end tests for POST /analyze over real HTTP.
//!
//! No AI key is configured in any of these, so every reply comes from the
//! built-in heuristic tutor and the responses are fully deterministic.

use serde_json::{json, Value};
use std::sync::Arc;
use tutord::config::{ExecConfig, LlmConfig, TutorConfig};
use tutord::{rest, AppContext};

/// Serve the API with no AI key on an OS-assigned port. Returns the base URL.
async fn spawn_api() -> String {
    let config = TutorConfig {
        port: 0,
        bind_address: "127.0.0.1".to_string(),
        log: "error".to_string(),
        log_format: "pretty".to_string(),
        llm: LlmConfig::default(),
        exec: ExecConfig::default(),
    };
    let ctx = Arc::new(AppContext::new(config).expect("context should build"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, rest::build_router(ctx)).await;
    });
    format!("http://{addr}")
}

async fn post_analyze(base: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/analyze"))
        .json(&body)
        .send()
        .await
        .expect("request should reach the server");
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.expect("response should be JSON");
    (status, body)
}

#[tokio::test]
async fn test_empty_body_is_rejected_with_field_problems() {
    let base = spawn_api().await;
    let (status, body) = post_analyze(&base, json!({})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid request");

    // hintLevel is defaulted by the route before validation, so an empty
    // body is missing exactly the three other required fields.
    let details = body["details"].as_array().expect("details array");
    assert_eq!(details.len(), 3, "details: {details:?}");
    assert_eq!(details[0], "code is required and must be a non-empty string");
    assert_eq!(
        details[1],
        "language is required and must be one of: python, c, cpp, java"
    );
    assert_eq!(
        details[2],
        "level is required and must be one of: basic, moderate, complex"
    );
}

#[tokio::test]
async fn test_unknown_language_is_rejected_with_the_allow_list() {
    let base = spawn_api().await;
    let (status, body) = post_analyze(
        &base,
        json!({"code": "fn main() {}", "language": "rust", "level": "basic", "hintLevel": 1}),
    )
    .await;

    assert_eq!(status, 400);
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert!(
        details[0].as_str().unwrap().contains("python, c, cpp, java"),
        "details: {details:?}"
    );
}

#[tokio::test]
async fn test_mixed_case_language_and_level_are_accepted() {
    let base = spawn_api().await;
    let (status, body) = post_analyze(
        &base,
        json!({"code": "x = 1", "language": "Python", "level": "BASIC", "hintLevel": 1}),
    )
    .await;

    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["source"], "fallback");
}

#[tokio::test]
async fn test_missing_colon_is_taught_by_the_builtin_tutor() {
    let base = spawn_api().await;

    // 1. The classic first-week mistake: a for header without its colon.
    let (status, body) = post_analyze(
        &base,
        json!({
            "code": "for i in range(10)\n  print(i)",
            "language": "python",
            "level": "basic",
            "hintLevel": 1
        }),
    )
    .await;
    assert_eq!(status, 200);

    // 2. With no AI key the reply must come from the fallback path.
    assert_eq!(body["source"], "fallback");

    // 3. The detector found the syntax problem and named the colon.
    let errors = body["detectedErrors"].as_array().expect("detectedErrors");
    assert!(
        errors.iter().any(|e| {
            e["type"] == "syntax" && e["description"].as_str().unwrap_or("").contains(':')
        }),
        "expected a syntax error about the colon, got: {errors:?}"
    );

    // 4. Hint level 1 serves the gentlest entry of the syntax progression.
    assert_eq!(
        body["hint"],
        "Read the flagged line out loud, symbol by symbol. Does anything feel unfinished?"
    );
    assert_eq!(body["hintLevel"], 1);

    // 5. Teaching fields are populated; the free-text reply is not.
    assert!(!body["explanation"].as_str().unwrap().is_empty());
    assert!(body["analogy"].is_string());
    assert!(body.get("reply").is_none());

    // 6. The server absorbed the analysis into the learning state.
    let state = &body["learningState"];
    assert_eq!(state["hintsGivenThisSession"], 1);
    assert_eq!(state["lastErrorType"], "syntax");
    assert_eq!(state["currentUnderstanding"], "learning");
}

#[tokio::test]
async fn test_hint_level_accepts_numeric_strings_and_echoes_back() {
    let base = spawn_api().await;
    let (status, body) = post_analyze(
        &base,
        json!({
            "code": "for i in range(10)\n  print(i)",
            "language": "python",
            "level": "basic",
            "hintLevel": "4"
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["hintLevel"], 4);
    assert!(
        body["hint"].as_str().unwrap().starts_with("Look at the very end"),
        "hint should be the level-4 syntax entry, got: {}",
        body["hint"]
    );
}

#[tokio::test]
async fn test_out_of_range_hint_level_is_rejected() {
    let base = spawn_api().await;
    let (status, body) = post_analyze(
        &base,
        json!({"code": "x = 1", "language": "python", "level": "basic", "hintLevel": 9}),
    )
    .await;

    assert_eq!(status, 400);
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert!(details[0].as_str().unwrap().starts_with("hintLevel"));
}

#[tokio::test]
async fn test_clean_bubble_sort_reads_as_quadratic_and_confident() {
    let base = spawn_api().await;
    let code = "for i in range(n):\n    for j in range(n - i - 1):\n        if a[j] > a[j + 1]:\n            a[j], a[j + 1] = a[j + 1], a[j]\n";
    let (status, body) = post_analyze(
        &base,
        json!({"code": code, "language": "python", "level": "basic", "hintLevel": 2}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["detectedErrors"].as_array().unwrap().len(), 0);
    assert_eq!(body["complexity"]["worst"], "O(n²)");
    assert_eq!(body["complexity"]["best"], "O(n²)");
    assert!(
        body["explanation"].as_str().unwrap().contains("didn't find anything"),
        "clean code should get encouragement, got: {}",
        body["explanation"]
    );
    assert_eq!(body["learningState"]["currentUnderstanding"], "confident");
    assert_eq!(body["suggestedNextConcept"], "loops and conditionals");
}

#[tokio::test]
async fn test_repeated_error_kind_marks_the_student_struggling() {
    let base = spawn_api().await;

    // The client carries state saying the last analysis also led with syntax.
    let (status, body) = post_analyze(
        &base,
        json!({
            "code": "for i in range(10)\n  print(i)",
            "language": "python",
            "level": "basic",
            "hintLevel": 1,
            "learningState": {
                "hintsGivenThisSession": 2,
                "errorHistory": ["syntax"],
                "lastErrorType": "syntax"
            }
        }),
    )
    .await;

    assert_eq!(status, 200);
    let state = &body["learningState"];
    assert_eq!(state["hintsGivenThisSession"], 3);
    assert_eq!(state["sameErrorRepeated"], true);
    assert_eq!(state["currentUnderstanding"], "struggling");
    assert!(
        state["strugglingConcepts"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "syntax details"),
        "state: {state:?}"
    );
}

#[tokio::test]
async fn test_free_text_question_gets_a_direct_reply() {
    let base = spawn_api().await;
    let (status, body) = post_analyze(
        &base,
        json!({
            "code": "for i in range(10)\n  print(i)",
            "language": "python",
            "level": "basic",
            "hintLevel": 1,
            "userQuestion": "Can you give me a hint?"
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert!(
        body["reply"].is_string(),
        "a question should produce a reply field, got: {body}"
    );
    // The detector finding still rides along in the explanation.
    assert!(body["explanation"].as_str().unwrap().contains("noticed"));
}
