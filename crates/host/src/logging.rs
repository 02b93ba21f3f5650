// Path: crates/host/src/logging.rs
//! Forwarding of runtime log and print calls into `tracing`.
//!
//! Everything the runtime module emits lands under target `runtime`; the
//! module's own target travels as a field.

use sbx_types::config::LogLevel;

/// Emits one runtime log record if `level` is enabled under `max`.
///
/// Returns whether the record was emitted.
pub fn forward_log(level: LogLevel, max: LogLevel, target: &[u8], message: &[u8]) -> bool {
    if level == LogLevel::Off || level > max {
        return false;
    }
    let target = String::from_utf8_lossy(target);
    let message = String::from_utf8_lossy(message);
    match level {
        LogLevel::Error => tracing::error!(target: "runtime", runtime_target = %target, "{}", message),
        LogLevel::Warn => tracing::warn!(target: "runtime", runtime_target = %target, "{}", message),
        LogLevel::Info => tracing::info!(target: "runtime", runtime_target = %target, "{}", message),
        LogLevel::Debug => tracing::debug!(target: "runtime", runtime_target = %target, "{}", message),
        LogLevel::Trace => tracing::trace!(target: "runtime", runtime_target = %target, "{}", message),
        LogLevel::Off => return false,
    }
    true
}

pub fn print_hex(data: &[u8]) {
    tracing::debug!(target: "runtime", "{}", hex::encode(data));
}

/// Prints `data` as text. Invalid UTF-8 is dropped rather than mangled.
pub fn print_utf8(data: &[u8]) {
    match std::str::from_utf8(data) {
        Ok(text) => tracing::debug!(target: "runtime", "{}", text),
        Err(_) => tracing::debug!(target: "runtime", len = data.len(), "dropped non-utf8 print"),
    }
}

pub fn print_num(value: u64) {
    tracing::debug!(target: "runtime", "{}", value);
}
