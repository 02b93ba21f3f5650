// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_histogram_vec, register_int_counter,
    register_int_counter_vec, Histogram, HistogramVec, IntCounter, IntCounterVec,
};

// --- Metric Statics ---
// The collectors are registered exactly once by `install`.

static HOST_CALLS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static HOST_CALL_DURATION_SECONDS: OnceCell<HistogramVec> = OnceCell::new();
static BATCH_VERIFICATIONS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static RUNTIME_TRAPS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static STORAGE_KEYS_CLEARED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static STORAGE_TRANSACTIONS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static STORAGE_DRAINED_CHANGES: OnceCell<Histogram> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Runs `$body` against the collector if `install()` has registered it.
macro_rules! with_metric {
    ($metric:ident, |$m:ident| $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl HostMetricsSink for PrometheusSink {
    fn inc_host_calls(&self, call: &'static str) {
        with_metric!(HOST_CALLS_TOTAL, |m| m.with_label_values(&[call]).inc());
    }
    fn observe_host_call_duration(&self, call: &'static str, duration_secs: f64) {
        with_metric!(HOST_CALL_DURATION_SECONDS, |m| m
            .with_label_values(&[call])
            .observe(duration_secs));
    }
    fn inc_batch_verifications(&self, passed: bool) {
        let verdict = if passed { "passed" } else { "failed" };
        with_metric!(BATCH_VERIFICATIONS_TOTAL, |m| m
            .with_label_values(&[verdict])
            .inc());
    }
    fn inc_runtime_traps(&self, entry: &str) {
        with_metric!(RUNTIME_TRAPS_TOTAL, |m| m.with_label_values(&[entry]).inc());
    }
}

impl StorageMetricsSink for PrometheusSink {
    fn inc_keys_cleared(&self, count: u64) {
        with_metric!(STORAGE_KEYS_CLEARED_TOTAL, |m| m.inc_by(count));
    }
    fn inc_transactions(&self, outcome: &'static str) {
        with_metric!(STORAGE_TRANSACTIONS_TOTAL, |m| m
            .with_label_values(&[outcome])
            .inc());
    }
    fn observe_drained_changes(&self, entries: u64) {
        with_metric!(STORAGE_DRAINED_CHANGES, |m| m.observe(entries as f64));
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        with_metric!(ERRORS_TOTAL, |m| m.with_label_values(&[kind, variant]).inc());
    }
}

fn set_once<T>(cell: &OnceCell<T>, value: T) -> Result<(), prometheus::Error> {
    cell.set(value).map_err(|_| prometheus::Error::AlreadyReg)
}

/// Registers every collector in the default registry and installs the global sink.
///
/// Must be called at most once; a second call fails with `AlreadyReg`.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    set_once(
        &HOST_CALLS_TOTAL,
        register_int_counter_vec!(
            "sbx_host_calls_total",
            "Total host calls dispatched, labeled by call.",
            &["call"]
        )?,
    )?;
    set_once(
        &HOST_CALL_DURATION_SECONDS,
        register_histogram_vec!(
            "sbx_host_call_duration_seconds",
            "Latency of a single host call.",
            &["call"],
            exponential_buckets(0.000_001, 4.0, 12)?
        )?,
    )?;
    set_once(
        &BATCH_VERIFICATIONS_TOTAL,
        register_int_counter_vec!(
            "sbx_batch_verifications_total",
            "Finished batch verification sessions, labeled by verdict.",
            &["verdict"]
        )?,
    )?;
    set_once(
        &RUNTIME_TRAPS_TOTAL,
        register_int_counter_vec!(
            "sbx_runtime_traps_total",
            "Runtime calls that ended in a trap, labeled by entry point.",
            &["entry"]
        )?,
    )?;
    set_once(
        &STORAGE_KEYS_CLEARED_TOTAL,
        register_int_counter!(
            "sbx_storage_keys_cleared_total",
            "Keys deleted by prefix clears."
        )?,
    )?;
    set_once(
        &STORAGE_TRANSACTIONS_TOTAL,
        register_int_counter_vec!(
            "sbx_storage_transactions_total",
            "Closed storage transactions, labeled by outcome.",
            &["outcome"]
        )?,
    )?;
    set_once(
        &STORAGE_DRAINED_CHANGES,
        register_histogram!(
            "sbx_storage_drained_changes",
            "Entries carried by a drained change set.",
            exponential_buckets(1.0, 4.0, 10)?
        )?,
    )?;
    set_once(
        &ERRORS_TOTAL,
        register_int_counter_vec!(
            "sbx_errors_total",
            "Total errors, labeled by kind and variant code.",
            &["kind", "variant"]
        )?,
    )?;

    static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;
    SINK.set(&PROMETHEUS_SINK)
        .map_err(|_| prometheus::Error::AlreadyReg)?;
    Ok(&PROMETHEUS_SINK)
}
