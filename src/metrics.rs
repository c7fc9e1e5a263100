//! Simple in-process counters exposed as `GET /metrics` in Prometheus text format.
//! No external library needed; all counters are `AtomicU64` incremented inline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// In-process request counters shared across all connections.
#[derive(Debug)]
pub struct TutorMetrics {
    /// Total /analyze requests received since server start.
    pub analyze_requests: AtomicU64,
    /// /analyze requests answered by the AI model.
    pub analyze_llm: AtomicU64,
    /// /analyze requests answered by the built-in tutor.
    pub analyze_fallback: AtomicU64,
    /// AI calls that failed or timed out and fell back.
    pub llm_failures: AtomicU64,
    /// Requests rejected with a 400 validation error.
    pub validation_failures: AtomicU64,
    /// Replies where the sanitizer redacted a full solution.
    pub solutions_redacted: AtomicU64,
    /// Total /run requests received since server start.
    pub run_requests: AtomicU64,
    /// Total /analyze-image requests received since server start.
    pub image_requests: AtomicU64,
    /// Server start time, used to calculate uptime in the metrics response.
    pub started_at: Instant,
}

impl TutorMetrics {
    pub fn new() -> Self {
        Self {
            analyze_requests: AtomicU64::new(0),
            analyze_llm: AtomicU64::new(0),
            analyze_fallback: AtomicU64::new(0),
            llm_failures: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            solutions_redacted: AtomicU64::new(0),
            run_requests: AtomicU64::new(0),
            image_requests: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn inc_analyze_requests(&self) {
        self.analyze_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_analyze_llm(&self) {
        self.analyze_llm.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_analyze_fallback(&self) {
        self.analyze_fallback.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_llm_failures(&self) {
        self.llm_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_validation_failures(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_solutions_redacted(&self) {
        self.solutions_redacted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_run_requests(&self) {
        self.run_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_image_requests(&self) {
        self.image_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Render counters in Prometheus text format.
    pub fn render_prometheus(&self) -> String {
        let uptime = self.started_at.elapsed().as_secs();
        let analyze_requests = self.analyze_requests.load(Ordering::Relaxed);
        let analyze_llm = self.analyze_llm.load(Ordering::Relaxed);
        let analyze_fallback = self.analyze_fallback.load(Ordering::Relaxed);
        let llm_failures = self.llm_failures.load(Ordering::Relaxed);
        let validation_failures = self.validation_failures.load(Ordering::Relaxed);
        let solutions_redacted = self.solutions_redacted.load(Ordering::Relaxed);
        let run_requests = self.run_requests.load(Ordering::Relaxed);
        let image_requests = self.image_requests.load(Ordering::Relaxed);

        format!(
            "# HELP tutord_uptime_seconds Server uptime in seconds.\n\
             # TYPE tutord_uptime_seconds gauge\n\
             tutord_uptime_seconds {uptime}\n\
             # HELP tutord_analyze_requests_total Total /analyze requests since server start.\n\
             # TYPE tutord_analyze_requests_total counter\n\
             tutord_analyze_requests_total {analyze_requests}\n\
             # HELP tutord_analyze_llm_total Analyses answered by the AI model.\n\
             # TYPE tutord_analyze_llm_total counter\n\
             tutord_analyze_llm_total {analyze_llm}\n\
             # HELP tutord_analyze_fallback_total Analyses answered by the built-in tutor.\n\
             # TYPE tutord_analyze_fallback_total counter\n\
             tutord_analyze_fallback_total {analyze_fallback}\n\
             # HELP tutord_llm_failures_total AI calls that failed or timed out.\n\
             # TYPE tutord_llm_failures_total counter\n\
             tutord_llm_failures_total {llm_failures}\n\
             # HELP tutord_validation_failures_total Requests rejected with a 400 validation error.\n\
             # TYPE tutord_validation_failures_total counter\n\
             tutord_validation_failures_total {validation_failures}\n\
             # HELP tutord_solutions_redacted_total Replies where a full solution was redacted.\n\
             # TYPE tutord_solutions_redacted_total counter\n\
             tutord_solutions_redacted_total {solutions_redacted}\n\
             # HELP tutord_run_requests_total Total /run requests since server start.\n\
             # TYPE tutord_run_requests_total counter\n\
             tutord_run_requests_total {run_requests}\n\
             # HELP tutord_image_requests_total Total /analyze-image requests since server start.\n\
             # TYPE tutord_image_requests_total counter\n\
             tutord_image_requests_total {image_requests}\n"
        )
    }
}

impl Default for TutorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle, cheap to clone.
pub type SharedMetrics = Arc<TutorMetrics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_increment() {
        let m = TutorMetrics::new();
        m.inc_analyze_requests();
        m.inc_analyze_requests();
        m.inc_analyze_fallback();
        assert_eq!(m.analyze_requests.load(Ordering::Relaxed), 2);
        assert_eq!(m.analyze_fallback.load(Ordering::Relaxed), 1);
        assert_eq!(m.run_requests.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn prometheus_text_names_every_counter() {
        let m = TutorMetrics::new();
        m.inc_run_requests();
        let text = m.render_prometheus();
        assert!(text.contains("tutord_uptime_seconds"));
        assert!(text.contains("tutord_analyze_requests_total 0"));
        assert!(text.contains("tutord_run_requests_total 1"));
        assert!(text.contains("# TYPE tutord_analyze_llm_total counter"));
    }
}
