pub mod analysis;
pub mod config;
pub mod error;
pub mod exec;
pub mod learning;
pub mod llm;
pub mod metrics;
pub mod rest;
pub mod sanitize;
pub mod tutor;
pub mod vision;

use std::sync::Arc;

use config::TutorConfig;
use exec::ExecClient;
use llm::LlmClient;
use metrics::{SharedMetrics, TutorMetrics};

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<TutorConfig>,
    /// In-process Prometheus-style metrics counters.
    pub metrics: SharedMetrics,
    /// Chat-completion client. None when no API key is configured; every
    /// analysis then takes the built-in tutor path.
    pub llm: Option<LlmClient>,
    /// Remote code execution client.
    pub exec: ExecClient,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Wire up the outbound clients from config.
    pub fn new(config: TutorConfig) -> anyhow::Result<Self> {
        let llm = LlmClient::from_config(&config.llm)?;
        let exec = ExecClient::from_config(&config.exec)?;
        Ok(Self {
            config: Arc::new(config),
            metrics: Arc::new(TutorMetrics::new()),
            llm,
            exec,
            started_at: std::time::Instant::now(),
        })
    }
}
