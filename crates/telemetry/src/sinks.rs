// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_error_sink(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured host-call metrics sink.
pub fn host_metrics() -> &'static dyn HostMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_host_sink(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured storage metrics sink.
pub fn storage_metrics() -> &'static dyn StorageMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_storage_sink(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for metrics about calls crossing the runtime boundary.
pub trait HostMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of dispatched host calls, labeled by call name.
    fn inc_host_calls(&self, call: &'static str);
    /// Observes the latency of one dispatched host call.
    fn observe_host_call_duration(&self, call: &'static str, duration_secs: f64);
    /// Increments the counter of finished batch verification sessions, labeled by verdict.
    fn inc_batch_verifications(&self, passed: bool);
    /// Increments the counter of runtime calls that ended in a trap.
    fn inc_runtime_traps(&self, entry: &str);
}
impl HostMetricsSink for NopSink {
    fn inc_host_calls(&self, _call: &'static str) {}
    fn observe_host_call_duration(&self, _call: &'static str, _duration_secs: f64) {}
    fn inc_batch_verifications(&self, _passed: bool) {}
    fn inc_runtime_traps(&self, _entry: &str) {}
}

/// A sink for metrics related to the transactional storage engine.
pub trait StorageMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the number of keys deleted by prefix clears.
    fn inc_keys_cleared(&self, count: u64);
    /// Increments the counter of closed transactions, labeled `commit` or `rollback`.
    fn inc_transactions(&self, outcome: &'static str);
    /// Observes how many entries a drained change set carried.
    fn observe_drained_changes(&self, entries: u64);
}
impl StorageMetricsSink for NopSink {
    fn inc_keys_cleared(&self, _count: u64) {}
    fn inc_transactions(&self, _outcome: &'static str) {}
    fn observe_drained_changes(&self, _entries: u64) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: HostMetricsSink + StorageMetricsSink + ErrorMetricsSink {
    /// This sink as a host-call sink.
    fn as_host_sink(&self) -> &dyn HostMetricsSink;
    /// This sink as a storage sink.
    fn as_storage_sink(&self) -> &dyn StorageMetricsSink;
    /// This sink as an error sink.
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink;
}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T
where
    T: HostMetricsSink + StorageMetricsSink + ErrorMetricsSink,
{
    fn as_host_sink(&self) -> &dyn HostMetricsSink {
        self
    }
    fn as_storage_sink(&self) -> &dyn StorageMetricsSink {
        self
    }
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink {
        self
    }
}
