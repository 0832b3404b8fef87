//! Prometheus metrics for WebAC.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `trellis_webac_resolutions_total` | Counter | `found` | Hierarchy resolutions |
//! | `trellis_webac_resolution_duration_seconds` | Histogram | - | Resolution latency |
//! | `trellis_webac_cache_lookups_total` | Counter | `result` | Cache hits and misses |
//! | `trellis_webac_decisions_total` | Counter | `decision` | Request access decisions |
//!
//! Recording functions are no-ops until a recorder is installed.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are exported.
    pub enabled: bool,

    /// Address of the Prometheus scrape endpoint (e.g., "0.0.0.0:9090").
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Installs the Prometheus recorder and scrape endpoint.
///
/// Must be called from within a tokio runtime when enabled.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidAddress` for a bad address and
/// `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let handle = PrometheusBuilder::new()
        .with_http_listener(addr)
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        "trellis_webac_resolutions_total",
        "ACL hierarchy resolutions by whether an ACL was found"
    );
    describe_histogram!(
        "trellis_webac_resolution_duration_seconds",
        "ACL hierarchy resolution duration in seconds"
    );
    describe_counter!(
        "trellis_webac_cache_lookups_total",
        "Access mode cache lookups by result"
    );
    describe_counter!(
        "trellis_webac_decisions_total",
        "Request access decisions by outcome"
    );
}

/// Records one hierarchy resolution.
///
/// `found` is false when no ACL applied up to the root.
pub fn record_resolution(found: bool, duration: Duration) {
    counter!("trellis_webac_resolutions_total", "found" => found.to_string()).increment(1);
    histogram!("trellis_webac_resolution_duration_seconds").record(duration.as_secs_f64());
}

/// Records a cache lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("trellis_webac_cache_lookups_total", "result" => result).increment(1);
}

/// Records a request access decision ("granted", "unauthenticated",
/// "forbidden").
pub fn record_decision(decision: &'static str) {
    counter!("trellis_webac_decisions_total", "decision" => decision).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
    }

    #[test]
    fn test_disabled_metrics_init() {
        assert!(init_metrics(&MetricsConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_address() {
        let config = MetricsConfig {
            enabled: true,
            addr: "not-an-address".to_string(),
        };
        assert!(matches!(
            init_metrics(&config),
            Err(TelemetryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_record_functions_dont_panic() {
        record_resolution(true, Duration::from_millis(3));
        record_cache_lookup(true);
        record_cache_lookup(false);
        record_decision("granted");
    }
}
