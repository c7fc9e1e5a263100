//! Tests for POST /run: validation, the happy path against a fake sandbox,
//! and the degrade-on-failure policy (an unreachable sandbox is never a 5xx).

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tutord::config::{ExecConfig, LlmConfig, TutorConfig};
use tutord::{rest, AppContext};

/// Serve the API on a random port with `/run` pointed at `exec_url`.
async fn spawn_api(exec_url: &str) -> String {
    let config = TutorConfig {
        port: 0,
        bind_address: "127.0.0.1".to_string(),
        log: "error".to_string(),
        log_format: "pretty".to_string(),
        llm: LlmConfig::default(),
        exec: ExecConfig {
            base_url: exec_url.to_string(),
            timeout_ms: 2_000,
        },
    };
    let ctx = Arc::new(AppContext::new(config).expect("context should build"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, rest::build_router(ctx)).await;
    });
    format!("http://{addr}")
}

/// A one-endpoint stand-in for the Piston sandbox: answers every POST with
/// `body`. Raw TCP keeps it free of server-framework baggage.
async fn spawn_fake_sandbox(body: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                // Read the full request (headers, then Content-Length bytes).
                let mut buf = Vec::new();
                let mut tmp = [0u8; 4096];
                loop {
                    match socket.read(&mut tmp).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&tmp[..n]),
                    }
                    if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                        let need = head
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        if buf.len() >= end + 4 + need {
                            break;
                        }
                    }
                }
                let resp = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(resp.as_bytes()).await;
            });
        }
    });
    format!("http://{addr}")
}

async fn post_run(base: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/run"))
        .json(&body)
        .send()
        .await
        .expect("request should reach the server");
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.expect("response should be JSON");
    (status, body)
}

#[tokio::test]
async fn test_run_requires_code_and_language() {
    let base = spawn_api("http://127.0.0.1:9").await;
    let (status, body) = post_run(&base, json!({})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid request");
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2, "details: {details:?}");
    assert_eq!(details[0], "code is required and must be a non-empty string");
    assert_eq!(
        details[1],
        "language is required and must be one of: python, c, cpp, java"
    );
}

#[tokio::test]
async fn test_run_rejects_unknown_language() {
    let base = spawn_api("http://127.0.0.1:9").await;
    let (status, body) =
        post_run(&base, json!({"code": "puts 1", "language": "ruby"})).await;

    assert_eq!(status, 400);
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert!(details[0].as_str().unwrap().contains("python, c, cpp, java"));
}

#[tokio::test]
async fn test_successful_run_returns_the_sandbox_output() {
    // 1. Fake sandbox answers with a clean run.
    let sandbox =
        spawn_fake_sandbox(r#"{"run": {"stdout": "hello\n", "stderr": "", "code": 0}}"#).await;
    let base = spawn_api(&sandbox).await;

    // 2. Run a snippet through it.
    let (status, body) = post_run(
        &base,
        json!({"code": "print('hello')", "language": "python"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["output"], "hello\n");
    assert_eq!(body["error"], "");
    assert_eq!(body["exitCode"], 0);
    assert!(body["executionTime"].is_number());
}

#[tokio::test]
async fn test_failed_run_carries_stderr_without_a_5xx() {
    let sandbox = spawn_fake_sandbox(
        r#"{"run": {"stdout": "", "stderr": "NameError: name 'x' is not defined", "code": 1}}"#,
    )
    .await;
    let base = spawn_api(&sandbox).await;

    let (status, body) = post_run(&base, json!({"code": "print(x)", "language": "python"})).await;

    assert_eq!(status, 200, "a failing program is not a server error");
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("NameError"));
    assert_eq!(body["exitCode"], 1);
}

#[tokio::test]
async fn test_unreachable_sandbox_degrades_to_a_friendly_failure() {
    // Port 9 (discard) is closed on loopback, so the connection is refused.
    let base = spawn_api("http://127.0.0.1:9").await;

    let (status, body) = post_run(
        &base,
        json!({"code": "print('hi')", "language": "python"}),
    )
    .await;

    assert_eq!(status, 200, "degrade policy: never a 5xx");
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Could not reach the run service"),
        "error: {}",
        body["error"]
    );
    assert_eq!(body["output"], "");
    assert!(body["executionTime"].is_number());
    assert!(body.get("exitCode").is_none());
}
