//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Active chat session gauge
//! - Published message counter
//! - Dropped delivery counter by drop policy
//! - Login counter by outcome

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active chat session gauge
pub static SESSIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("sessions_active", "Number of live chat sessions").namespace("chat_relay"),
    )
    .expect("Failed to create SESSIONS_ACTIVE metric")
});

/// Published message counter
pub static MESSAGES_PUBLISHED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "messages_published_total",
            "Total messages published to the room",
        )
        .namespace("chat_relay"),
    )
    .expect("Failed to create MESSAGES_PUBLISHED_TOTAL metric")
});

/// Dropped delivery counter - tracks outbound messages discarded by the
/// drop policy
pub static DELIVERIES_DROPPED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "deliveries_dropped_total",
            "Outbound deliveries discarded by the drop policy",
        )
        .namespace("chat_relay"),
        &["policy"],
    )
    .expect("Failed to create DELIVERIES_DROPPED_TOTAL metric")
});

/// Login counter by outcome
pub static LOGINS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("logins_total", "Login attempts by outcome").namespace("chat_relay"),
        &["outcome"],
    )
    .expect("Failed to create LOGINS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(SESSIONS_ACTIVE.clone()))
        .expect("Failed to register SESSIONS_ACTIVE");
    registry
        .register(Box::new(MESSAGES_PUBLISHED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_PUBLISHED_TOTAL");
    registry
        .register(Box::new(DELIVERIES_DROPPED_TOTAL.clone()))
        .expect("Failed to register DELIVERIES_DROPPED_TOTAL");
    registry
        .register(Box::new(LOGINS_TOTAL.clone()))
        .expect("Failed to register LOGINS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to track the live session count
pub fn set_active_sessions(count: usize) {
    SESSIONS_ACTIVE.set(count as i64);
}

/// Helper to count one published message
pub fn record_publish() {
    MESSAGES_PUBLISHED_TOTAL.inc();
}

/// Helper to count a discarded delivery
pub fn record_delivery_dropped(policy: &str) {
    DELIVERIES_DROPPED_TOTAL.with_label_values(&[policy]).inc();
}

/// Helper to count a login attempt
pub fn record_login(outcome: &str) {
    LOGINS_TOTAL.with_label_values(&[outcome]).inc();
}
