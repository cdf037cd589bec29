//! Prometheus metrics for the sentinel service
//!
//! Tracks cache effectiveness, provider call outcomes and API traffic.
//! Call [`init_metrics`] once at startup; if registration fails, metric
//! operations become no-ops so the service keeps running without metrics.

use prometheus::{
    register_counter, register_counter_vec, Counter, CounterVec, Encoder, TextEncoder,
};
use std::sync::OnceLock;

/// Container for all sentinel metrics
struct SentinelMetrics {
    cache_hits: Counter,
    cache_misses: Counter,
    provider_calls: Counter,
    provider_errors: Counter,
    api_requests: CounterVec,
}

/// Global storage for metrics
static METRICS: OnceLock<SentinelMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

/// Initialize all Prometheus metrics
///
/// Safe to call more than once; only the first attempt registers.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = SentinelMetrics {
        cache_hits: register_counter!(
            "sentinel_trend_cache_hits_total",
            "Trend cache hits served without a provider call"
        )?,
        cache_misses: register_counter!(
            "sentinel_trend_cache_misses_total",
            "Trend cache misses (absent or stale entries)"
        )?,
        provider_calls: register_counter!(
            "sentinel_provider_calls_total",
            "Live trend provider queries attempted"
        )?,
        provider_errors: register_counter!(
            "sentinel_provider_errors_total",
            "Trend provider queries that failed"
        )?,
        api_requests: register_counter_vec!(
            "sentinel_api_requests_total",
            "API requests by endpoint and status",
            &["endpoint", "status"]
        )?,
    };

    METRICS.set(metrics).ok();
    Ok(())
}

/// Record a cache hit
pub fn record_cache_hit() {
    if let Some(m) = METRICS.get() {
        m.cache_hits.inc();
    }
}

/// Record a cache miss
pub fn record_cache_miss() {
    if let Some(m) = METRICS.get() {
        m.cache_misses.inc();
    }
}

/// Record a provider query attempt
pub fn record_provider_call() {
    if let Some(m) = METRICS.get() {
        m.provider_calls.inc();
    }
}

/// Record a failed provider query
pub fn record_provider_error() {
    if let Some(m) = METRICS.get() {
        m.provider_errors.inc();
    }
}

/// Record an API request
pub fn record_api_request(endpoint: &str, status: u16) {
    if let Some(m) = METRICS.get() {
        m.api_requests
            .with_label_values(&[endpoint, &status.to_string()])
            .inc();
    }
}

/// Render all registered metrics in Prometheus text exposition format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_metrics().is_ok());
        assert!(init_metrics().is_ok());
    }

    #[test]
    fn test_recording_without_init_is_noop() {
        // Must not panic even if init never ran in this process order.
        record_cache_hit();
        record_cache_miss();
        record_provider_call();
        record_provider_error();
        record_api_request("/api/threat", 200);
    }

    #[test]
    fn test_gather_renders_text() {
        init_metrics().ok();
        record_cache_hit();
        let text = gather();
        assert!(text.contains("sentinel_trend_cache_hits_total"));
    }
}
