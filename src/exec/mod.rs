//! Remote code execution via a Piston-compatible sandbox.
//!
//! `/run` delegates entirely to the external service; this module owns the
//! wire mapping and the degrade-on-failure policy. An unreachable or
//! misbehaving sandbox never becomes a 5xx: the student sees a normal
//! response with `success: false` and a readable error.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::Language;
use crate::config::ExecConfig;

// ─── Wire types ───────────────────────────────────────────────────────────────

/// What `/run` returns to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub success: bool,
    pub output: String,
    pub error: String,
    /// Wall-clock milliseconds spent on the whole exchange.
    pub execution_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

#[derive(Debug, Serialize)]
struct PistonRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<PistonFile<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdin: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PistonFile<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct PistonResponse {
    compile: Option<PistonPhase>,
    run: Option<PistonPhase>,
}

#[derive(Debug, Default, Deserialize)]
struct PistonPhase {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    code: Option<i32>,
}

/// Piston names C++ differently from us; everything else matches.
fn piston_language(language: Language) -> &'static str {
    match language {
        Language::Python => "python",
        Language::C => "c",
        Language::Cpp => "c++",
        Language::Java => "java",
    }
}

// ─── Client ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExecClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExecClient {
    pub fn from_config(cfg: &ExecConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Execute `code` remotely. Degrades to `success: false` on any failure.
    pub async fn run_code(
        &self,
        language: Language,
        code: &str,
        stdin: Option<&str>,
    ) -> RunOutcome {
        let started = Instant::now();
        let request = PistonRequest {
            language: piston_language(language),
            version: "*",
            files: vec![PistonFile { content: code }],
            stdin,
        };

        let result = self
            .http
            .post(format!("{}/execute", self.base_url))
            .json(&request)
            .send()
            .await;

        let elapsed = started.elapsed().as_millis() as u64;
        match result {
            Ok(response) => match response.error_for_status() {
                Ok(response) => match response.json::<PistonResponse>().await {
                    Ok(body) => outcome_from(body, elapsed),
                    Err(e) => degraded(elapsed, &format!("run service sent an unreadable reply: {e}")),
                },
                Err(e) => {
                    warn!("run service rejected the request: {e}");
                    degraded(elapsed, "The run service rejected the request. Try again in a moment.")
                }
            },
            Err(e) => {
                warn!("run service unreachable: {e}");
                degraded(
                    elapsed,
                    "Could not reach the run service. Check your connection and try again.",
                )
            }
        }
    }
}

fn degraded(elapsed: u64, error: &str) -> RunOutcome {
    RunOutcome {
        success: false,
        output: String::new(),
        error: error.to_string(),
        execution_time: elapsed,
        exit_code: None,
    }
}

/// Fold Piston's compile and run phases into one outcome. A failing compile
/// phase wins; otherwise the run phase decides.
fn outcome_from(body: PistonResponse, elapsed: u64) -> RunOutcome {
    if let Some(compile) = &body.compile {
        if compile.code.unwrap_or(0) != 0 {
            return RunOutcome {
                success: false,
                output: compile.stdout.clone(),
                error: compile.stderr.clone(),
                execution_time: elapsed,
                exit_code: compile.code,
            };
        }
    }

    match body.run {
        Some(run) => RunOutcome {
            success: run.code == Some(0),
            output: run.stdout,
            error: run.stderr,
            execution_time: elapsed,
            exit_code: run.code,
        },
        None => degraded(elapsed, "run service returned no execution result"),
    }
}
