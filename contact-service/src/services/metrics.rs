//! Metrics collection for contact-service.
//!
//! HTTP request metrics come from the shared middleware through the
//! `metrics` facade; submission outcomes live in a dedicated Prometheus
//! registry so spam volume stays visible without logging every bot.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static CONTACT_SUBMISSIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// How a contact submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Stored,
    Unstored,
    Spam,
    Failed,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Stored => "stored",
            SubmissionOutcome::Unstored => "unstored",
            SubmissionOutcome::Spam => "spam",
            SubmissionOutcome::Failed => "failed",
        }
    }
}

/// Initialize metrics collection. Calling it again is a no-op.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }

    let registry = Registry::new();

    let submissions_counter = IntCounterVec::new(
        Opts::new(
            "contact_submissions_total",
            "Total contact form submissions by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create contact_submissions_total metric");

    registry
        .register(Box::new(submissions_counter.clone()))
        .expect("Failed to register contact_submissions_total");

    PROMETHEUS_REGISTRY
        .set(registry)
        .expect("Failed to set prometheus registry");
    CONTACT_SUBMISSIONS_TOTAL
        .set(submissions_counter)
        .expect("Failed to set contact_submissions_total");
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

pub fn record_submission(outcome: SubmissionOutcome) {
    if let Some(counter) = CONTACT_SUBMISSIONS_TOTAL.get() {
        counter.with_label_values(&[outcome.as_str()]).inc();
    }
}
