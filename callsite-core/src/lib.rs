// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Call-Site Latency Harness
//!
//! Measures the latency a caller observes when invoking a logging backend
//! concurrently from CPU-pinned threads.
//!
//! # Components
//!
//! - **Affinity**: pins the control thread to CPU 0 and worker `i` to CPU `i`
//! - **Sampler**: one discarded warm-up call, then `N` timed calls per worker
//! - **Metrics**: p50/p75/p90/p99/p99.9, worst and mean over each series
//! - **Orchestrator**: runs every thread-count scenario behind a join barrier

pub mod affinity;
pub mod backend;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod report;
pub mod sampler;

// Re-export commonly used types
pub use affinity::{AffinityController, Pinning};
pub use backend::{BackendLauncher, LogBackend};
pub use config::BenchmarkConfig;
pub use error::{BackendError, ConfigError, HarnessError, HarnessResult};
pub use metrics::{PercentileReport, Quantile};
pub use orchestrator::{Orchestrator, RunState};
pub use report::{RunSummary, ScenarioOutcome, ThreadReport};
pub use sampler::{LatencySampler, LatencySeries};
