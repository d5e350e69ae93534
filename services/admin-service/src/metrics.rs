use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use common_security::Decision;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct PortalMetrics {
    registry: Registry,
    policy_decisions: IntCounterVec,
    auth_failures: IntCounterVec,
    login_attempts: IntCounterVec,
}

impl PortalMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let policy_decisions = IntCounterVec::new(
            Opts::new(
                "admin_policy_decisions_total",
                "Authorization decisions grouped by policy and outcome",
            ),
            &["policy", "outcome"],
        )?;
        registry.register(Box::new(policy_decisions.clone()))?;

        let auth_failures = IntCounterVec::new(
            Opts::new(
                "admin_auth_failures_total",
                "Rejected credentials grouped by reason code",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(auth_failures.clone()))?;

        let login_attempts = IntCounterVec::new(
            Opts::new(
                "admin_login_attempts_total",
                "Count of login attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts.clone()))?;

        Ok(Self {
            registry,
            policy_decisions,
            auth_failures,
            login_attempts,
        })
    }

    pub fn policy_decision(&self, policy: &str, decision: Decision) {
        self.policy_decisions
            .with_label_values(&[policy, decision.as_str()])
            .inc();
    }

    pub fn auth_failure(&self, reason: &str) {
        self.auth_failures.with_label_values(&[reason]).inc();
    }

    pub fn login_attempt(&self, outcome: &str) {
        self.login_attempts.with_label_values(&[outcome]).inc();
    }

    pub fn policy_decision_count(&self, policy: &str, decision: Decision) -> u64 {
        self.policy_decisions
            .with_label_values(&[policy, decision.as_str()])
            .get()
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
