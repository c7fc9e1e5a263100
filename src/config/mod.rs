use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_VISION_MODEL: &str = "gpt-4o";
const DEFAULT_LLM_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_EXEC_BASE_URL: &str = "https://emkc.org/api/v2/piston";
const DEFAULT_EXEC_TIMEOUT_MS: u64 = 15_000;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── LlmConfig ────────────────────────────────────────────────────────────────

/// Upstream chat-completion settings (`[llm]` in tutord.toml).
///
/// With no API key configured the server still works: every analysis is
/// answered by the built-in tutor instead of the AI model.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key for the chat-completion service. None = fallback-only mode.
    /// Set via `TUTORD_LLM_API_KEY` or `OPENAI_API_KEY` env var, or `api_key` in tutord.toml.
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Model used for text analysis (default: gpt-4o-mini).
    pub model: String,
    /// Model used to read code out of screenshots (default: gpt-4o).
    pub vision_model: String,
    /// Per-request timeout in milliseconds (default: 10000).
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            timeout_ms: DEFAULT_LLM_TIMEOUT_MS,
        }
    }
}

// ─── ExecConfig ───────────────────────────────────────────────────────────────

/// Remote code execution settings (`[exec]` in tutord.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Base URL of the Piston execution API (default: https://emkc.org/api/v2/piston).
    pub base_url: String,
    /// Per-run timeout in milliseconds (default: 15000).
    pub timeout_ms: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXEC_BASE_URL.to_string(),
            timeout_ms: DEFAULT_EXEC_TIMEOUT_MS,
        }
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `tutord.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 3001).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Log level filter string, e.g. "debug", "info,tutord=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured).
    log_format: Option<String>,
    /// Chat-completion upstream (`[llm]`).
    llm: Option<LlmConfig>,
    /// Code execution upstream (`[exec]`).
    exec: Option<ExecConfig>,
}

fn load_toml(path: &Path) -> Option<TomlConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config file, using defaults");
            None
        }
    }
}

// ─── TutorConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TutorConfig {
    pub port: u16,
    /// Bind address for the HTTP server (TUTORD_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Log level filter string (default: "info").
    pub log: String,
    /// Log output format: "pretty" (default) | "json" (for log aggregators).
    pub log_format: String,
    /// Chat-completion upstream. No API key means every analysis takes the fallback path.
    pub llm: LlmConfig,
    /// Remote code execution upstream.
    pub exec: ExecConfig,
}

impl TutorConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env, passed as `Some(value)` from clap
    ///   2. TOML file (default path: ./tutord.toml)
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        config_path: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let path = config_path.unwrap_or_else(|| PathBuf::from("tutord.toml"));
        let toml = load_toml(&path).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("TUTORD_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("TUTORD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let mut llm = toml.llm.unwrap_or_default();
        llm.api_key = std::env::var("TUTORD_LLM_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()))
            .or(llm.api_key);
        llm.base_url = std::env::var("TUTORD_LLM_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(llm.base_url);
        llm.model = std::env::var("TUTORD_LLM_MODEL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(llm.model);

        let mut exec = toml.exec.unwrap_or_default();
        exec.base_url = std::env::var("TUTORD_EXEC_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(exec.base_url);

        Self {
            port,
            bind_address,
            log,
            log_format,
            llm,
            exec,
        }
    }

    /// The socket address string the HTTP server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Assertions stick to fields with no env-var override so a developer's
    // shell (OPENAI_API_KEY etc.) cannot flip them.

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("tutord.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn toml_values_fill_in_when_cli_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
port = 4500
log = "debug"

[llm]
timeout_ms = 2500

[exec]
timeout_ms = 9000
"#,
        );
        let cfg = TutorConfig::new(None, Some(path), None, None);
        assert_eq!(cfg.port, 4500);
        assert_eq!(cfg.log, "debug");
        assert_eq!(cfg.llm.timeout_ms, 2500);
        assert_eq!(cfg.exec.timeout_ms, 9000);
    }

    #[test]
    fn cli_beats_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "port = 4500\nlog = \"debug\"\n");
        let cfg = TutorConfig::new(Some(9000), Some(path), Some("trace".to_string()), None);
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.log, "trace");
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TutorConfig::new(None, Some(dir.path().join("nope.toml")), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.llm.timeout_ms, DEFAULT_LLM_TIMEOUT_MS);
        assert_eq!(cfg.exec.timeout_ms, DEFAULT_EXEC_TIMEOUT_MS);
    }

    #[test]
    fn unparseable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "port = {not valid toml");
        let cfg = TutorConfig::new(None, Some(path), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn partial_llm_section_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[llm]\ntimeout_ms = 1234\n");
        let cfg = TutorConfig::new(None, Some(path), None, None);
        assert_eq!(cfg.llm.timeout_ms, 1234);
        assert_eq!(cfg.llm.vision_model, DEFAULT_VISION_MODEL);
    }
}
