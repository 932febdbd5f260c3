// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark parameters.
//!
//! The scenario list and iteration count are fixed per build of the tool;
//! the builder exists so tests and benches can shrink them.

use std::time::Duration;

use crate::error::ConfigError;

/// Worker counts exercised by a default run, in order.
pub const DEFAULT_SCENARIOS: [usize; 4] = [1, 2, 3, 4];

/// Timed calls recorded per worker.
pub const DEFAULT_ITERATIONS: usize = 100_000;

/// Pause after the backend starts, before the first scenario.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    scenarios: Vec<usize>,
    iterations: usize,
    settle_delay: Duration,
}

impl BenchmarkConfig {
    /// Create a configuration with the default parameters.
    pub fn new() -> Self {
        Self {
            scenarios: DEFAULT_SCENARIOS.to_vec(),
            iterations: DEFAULT_ITERATIONS,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Set the worker-count scenarios, run in the given order.
    pub fn scenarios(mut self, scenarios: impl IntoIterator<Item = usize>) -> Self {
        self.scenarios = scenarios.into_iter().collect();
        self
    }

    /// Set the number of recorded calls per worker.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the pause taken after the backend starts.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn scenario_list(&self) -> &[usize] {
        &self.scenarios
    }

    pub fn iteration_count(&self) -> usize {
        self.iterations
    }

    pub fn settle(&self) -> Duration {
        self.settle_delay
    }

    /// Largest worker count across all scenarios.
    pub fn max_threads(&self) -> usize {
        self.scenarios.iter().copied().max().unwrap_or(0)
    }

    /// Check the configuration before any thread is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }

        if let Some(position) = self.scenarios.iter().position(|&t| t == 0) {
            return Err(ConfigError::ZeroThreadCount { position });
        }

        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }

        Ok(())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::new()
    }
}
