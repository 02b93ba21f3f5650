// Path: crates/types/src/config/mod.rs
//! Host configuration.
//!
//! A single TOML document configures every execution context the host creates.
//! Each field carries a serde default so an empty document is a valid configuration.

use crate::error::CoreError;
use crate::state::StateVersion;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The maximum log level a runtime module may emit, as reported by `logging.max_level`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Logging is disabled.
    Off = 0,
    /// Errors only.
    Error = 1,
    /// Warnings and above.
    Warn = 2,
    /// Informational messages and above.
    #[default]
    Info = 3,
    /// Debug messages and above.
    Debug = 4,
    /// Everything.
    Trace = 5,
}

impl LogLevel {
    /// Maps the numeric level passed by the runtime module (1 = error .. 5 = trace).
    pub fn from_wire(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(LogLevel::Off),
            1 => Some(LogLevel::Error),
            2 => Some(LogLevel::Warn),
            3 => Some(LogLevel::Info),
            4 => Some(LogLevel::Debug),
            5 => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// The numeric level reported back to the runtime module.
    pub fn to_wire(self) -> u32 {
        self as u32
    }
}

/// Configuration for the sandbox host and every execution context it creates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// The level reported by `logging.max_level`; runtime log calls above it are dropped.
    #[serde(default)]
    pub max_log_level: LogLevel,
    /// Fuel granted to a single runtime call; exhaustion terminates the context.
    #[serde(default = "default_fuel_limit")]
    pub fuel_limit: u64,
    /// Maximum nesting of storage transactions.
    #[serde(default = "default_max_transaction_depth")]
    pub max_transaction_depth: usize,
    /// Number of 64 KiB pages linear memory is grown to before a call.
    #[serde(default = "default_heap_pages")]
    pub heap_pages: u32,
    /// Evaluate queued batch verification checks in parallel.
    #[serde(default = "default_batch_verify_parallel")]
    pub batch_verify_parallel: bool,
    /// The state version used by version-1 root calls.
    #[serde(default)]
    pub state_version: StateVersion,
}

fn default_fuel_limit() -> u64 {
    10_000_000_000
}
fn default_max_transaction_depth() -> usize {
    1024
}
fn default_heap_pages() -> u32 {
    2048
}
fn default_batch_verify_parallel() -> bool {
    true
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_log_level: LogLevel::default(),
            fuel_limit: default_fuel_limit(),
            max_transaction_depth: default_max_transaction_depth(),
            heap_pages: default_heap_pages(),
            batch_verify_parallel: default_batch_verify_parallel(),
            state_version: StateVersion::default(),
        }
    }
}

impl HostConfig {
    /// Parses a configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = HostConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, HostConfig::default());
        assert_eq!(cfg.max_transaction_depth, 1024);
        assert_eq!(cfg.state_version, StateVersion::V0);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = HostConfig::from_toml_str(
            r#"
            max_log_level = "debug"
            fuel_limit = 5000
            state_version = "V1"
            batch_verify_parallel = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.max_log_level, LogLevel::Debug);
        assert_eq!(cfg.fuel_limit, 5000);
        assert_eq!(cfg.state_version, StateVersion::V1);
        assert!(!cfg.batch_verify_parallel);
        assert_eq!(cfg.heap_pages, 2048);
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = HostConfig::from_toml_str("fuel_limit = \"lots\"").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn log_levels_round_trip_the_wire_numbering() {
        assert_eq!(LogLevel::from_wire(LogLevel::Warn.to_wire()), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_wire(9), None);
    }
}
