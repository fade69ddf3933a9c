//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Upload slot (accepted/rejected uploads)
//! - Pipeline invoker (conversions, duration)
//! - Artifact store and archive builder (deletions, bundles)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Upload Slot
// =============================================================================

/// Uploads by result.
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lectern_uploads_total", "Total document uploads"),
        &["result"], // "accepted", "rejected", "failed"
    )
    .unwrap()
});

// =============================================================================
// Pipeline
// =============================================================================

/// Conversions by result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lectern_conversions_total", "Total pipeline conversions"),
        &["result"], // "success", "failure", "timeout"
    )
    .unwrap()
});

/// Conversion duration in seconds.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "lectern_conversion_duration_seconds",
            "Duration of pipeline runs",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Artifacts
// =============================================================================

/// Audio artifacts deleted through clear.
pub static ARTIFACTS_DELETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lectern_artifacts_deleted_total",
        "Total audio artifacts deleted",
    )
    .unwrap()
});

/// Bundles built by result.
pub static BUNDLES_BUILT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lectern_bundles_built_total", "Total archive bundle builds"),
        &["result"], // "success", "empty", "failure"
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(UPLOADS_TOTAL.clone()),
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(ARTIFACTS_DELETED.clone()),
        Box::new(BUNDLES_BUILT.clone()),
    ]
}
