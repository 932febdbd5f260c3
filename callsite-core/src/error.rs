// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Error types for the latency harness.
//!
//! Every failure the harness can report is an explicit enum variant.
//! A failing backend call is not one of them: it panics the worker and
//! takes the process down with it.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a benchmark run.
#[derive(Debug, Error)]
pub enum HarnessError {
    // =========================================================================
    // Configuration Errors - Rejected Before Any Scenario Runs
    // =========================================================================
    #[error("Invalid benchmark configuration: {0}")]
    Config(#[from] ConfigError),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // =========================================================================
    // Run Errors
    // =========================================================================
    #[error("Cannot aggregate an empty latency series")]
    EmptySeries,

    #[error("Failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report: {source}")]
    Output {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid orchestrator transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Configuration errors detected by `BenchmarkConfig::validate`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one thread-count scenario is required")]
    NoScenarios,

    #[error("Scenario {position} has a thread count of zero")]
    ZeroThreadCount { position: usize },

    #[error("Iteration count must be at least 1")]
    ZeroIterations,
}

/// Errors raised while bringing a backend up.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to prepare log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Backend '{backend}' failed to start: {reason}")]
    Start { backend: String, reason: String },
}

/// Result type alias using HarnessError.
pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ZeroThreadCount { position: 2 };
        assert!(err.to_string().contains("Scenario 2"));
    }

    #[test]
    fn test_error_chain() {
        let harness_err: HarnessError = ConfigError::ZeroIterations.into();
        assert!(matches!(
            harness_err,
            HarnessError::Config(ConfigError::ZeroIterations)
        ));
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::LogFile {
            path: PathBuf::from("/nonexistent/bench.log"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/nonexistent/bench.log"));
    }
}
