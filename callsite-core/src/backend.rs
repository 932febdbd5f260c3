// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Capability interface for the logging backend under test.

use std::time::{Duration, Instant};

use crate::error::BackendError;

/// A logging call whose caller-side latency is measured.
///
/// Implementations may run their own background machinery; the harness only
/// ever observes the duration returned by [`LogBackend::call`].
pub trait LogBackend: Send + Sync {
    /// Name printed in scenario headers.
    fn name(&self) -> &str;

    /// Emit one log record.
    fn log(&self, seq: i32, value: f64, tag: &str);

    /// Emit one record and return the time the caller spent in it.
    ///
    /// Override when the backend needs per-call setup that must stay outside
    /// the measured window.
    fn call(&self, seq: i32, value: f64, tag: &str) -> Duration {
        let start = Instant::now();
        self.log(seq, value, tag);
        start.elapsed()
    }
}

/// Starts a backend once per benchmark run.
pub trait BackendLauncher {
    /// Bring the backend up. Called on the control thread after it has been
    /// pinned, so threads spawned here inherit the control CPU.
    fn launch(&self) -> Result<Box<dyn LogBackend>, BackendError>;
}
