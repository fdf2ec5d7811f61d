//! Prometheus metrics for the greenmiles service.
//!
//! This module provides metrics for:
//! - Route comparison throughput and latency
//! - Green Miles awarded
//! - Check-in accept/reject outcomes
//! - Redemption code lifecycle

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Route comparisons computed counter metric name.
pub const METRIC_COMPARISONS: &str = "route_comparisons_total";
/// Route comparison latency metric name.
pub const METRIC_COMPARISON_LATENCY: &str = "route_comparison_latency_ms";
/// Miles awarded histogram metric name.
pub const METRIC_MILES_AWARDED: &str = "green_miles_awarded";
/// Check-ins accepted counter metric name.
pub const METRIC_CHECKINS_ACCEPTED: &str = "checkins_accepted_total";
/// Check-ins rejected counter metric name.
pub const METRIC_CHECKINS_REJECTED: &str = "checkins_rejected_total";
/// Redemption codes issued counter metric name.
pub const METRIC_REDEMPTIONS_ISSUED: &str = "redemptions_issued_total";
/// Redemption codes consumed counter metric name.
pub const METRIC_REDEMPTIONS_CONSUMED: &str = "redemptions_consumed_total";

/// Install the Prometheus recorder and return its render handle.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_COMPARISONS, "Total route comparisons computed");
    describe_histogram!(
        METRIC_COMPARISON_LATENCY,
        "Route comparison latency in milliseconds"
    );
    describe_histogram!(METRIC_MILES_AWARDED, "Green Miles awarded per earn event");
    describe_counter!(METRIC_CHECKINS_ACCEPTED, "Total check-ins accepted");
    describe_counter!(METRIC_CHECKINS_REJECTED, "Total check-ins rejected");
    describe_counter!(METRIC_REDEMPTIONS_ISSUED, "Total redemption codes issued");
    describe_counter!(
        METRIC_REDEMPTIONS_CONSUMED,
        "Total redemption codes consumed"
    );

    debug!("Metrics initialized");
}

/// Record route comparison latency.
pub fn record_comparison_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_COMPARISON_LATENCY).record(latency_ms);
}

/// Record miles awarded by one earn event.
pub fn record_miles_awarded(miles: f64) {
    histogram!(METRIC_MILES_AWARDED).record(miles);
}

/// Increment comparisons computed counter.
pub fn inc_comparisons() {
    counter!(METRIC_COMPARISONS).increment(1);
}

/// Increment check-ins accepted counter.
pub fn inc_checkins_accepted() {
    counter!(METRIC_CHECKINS_ACCEPTED).increment(1);
}

/// Increment check-ins rejected counter.
pub fn inc_checkins_rejected() {
    counter!(METRIC_CHECKINS_REJECTED).increment(1);
}

/// Increment redemptions issued counter.
pub fn inc_redemptions_issued() {
    counter!(METRIC_REDEMPTIONS_ISSUED).increment(1);
}

/// Increment redemptions consumed counter.
pub fn inc_redemptions_consumed() {
    counter!(METRIC_REDEMPTIONS_CONSUMED).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for route comparisons.
pub fn timer_comparison() -> LatencyTimer {
    LatencyTimer::new(METRIC_COMPARISON_LATENCY)
}
