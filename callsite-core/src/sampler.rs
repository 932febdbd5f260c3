// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-thread timed call loop.
//!
//! One untimed warm-up call absorbs first-use costs in the backend, then
//! every iteration records the caller-side duration of exactly one call.

use std::time::Duration;

use crate::backend::LogBackend;

/// Sequence number passed to the warm-up call.
pub const WARMUP_SEQ: i32 = 100;
/// Value passed to the warm-up call.
pub const WARMUP_VALUE: f64 = 100.0;
/// Tag passed to the warm-up call.
pub const WARMUP_TAG: &str = "initial";
/// Tag passed to every recorded call.
pub const SAMPLE_TAG: &str = "benchmark";

/// Latency samples in nanoseconds, in recording order.
///
/// Owned by the worker that recorded them until handed to the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencySeries {
    samples: Vec<u64>,
}

impl LatencySeries {
    /// Create an empty series sized for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append one duration, saturating at `u64::MAX` nanoseconds.
    pub fn record(&mut self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.samples.push(nanos);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u64> {
        self.samples
    }
}

impl From<Vec<u64>> for LatencySeries {
    fn from(samples: Vec<u64>) -> Self {
        Self { samples }
    }
}

/// Value logged for iteration `i`.
pub fn sample_value(i: usize) -> f64 {
    let i = i as f64;
    i + 0.1 * i
}

/// Runs the timed call loop on the current thread.
#[derive(Debug, Clone, Copy)]
pub struct LatencySampler {
    iterations: usize,
}

impl LatencySampler {
    /// Create a sampler recording `iterations` calls.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Warm the backend up, then record one sample per iteration.
    ///
    /// The returned series always holds exactly `iterations` samples.
    pub fn run(&self, target: &dyn LogBackend) -> LatencySeries {
        let _ = target.call(WARMUP_SEQ, WARMUP_VALUE, WARMUP_TAG);

        let mut series = LatencySeries::with_capacity(self.iterations);
        for i in 0..self.iterations {
            let value = sample_value(i);
            // Sequence numbers wrap like the i32 counter they model.
            let elapsed = target.call(i as i32, value, SAMPLE_TAG);
            series.record(elapsed);
        }

        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call and reports a duration derived from the sequence.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<(i32, f64, String)>>,
    }

    impl LogBackend for RecordingBackend {
        fn name(&self) -> &str {
            "recording"
        }

        fn log(&self, seq: i32, value: f64, tag: &str) {
            self.calls.lock().unwrap().push((seq, value, tag.to_string()));
        }

        fn call(&self, seq: i32, value: f64, tag: &str) -> Duration {
            self.log(seq, value, tag);
            Duration::from_nanos(seq as u64 * 10)
        }
    }

    #[test]
    fn test_series_length_matches_iterations() {
        let backend = RecordingBackend::default();
        let series = LatencySampler::new(250).run(&backend);

        assert_eq!(series.len(), 250);
        // One extra call for the warm-up
        assert_eq!(backend.calls.lock().unwrap().len(), 251);
    }

    #[test]
    fn test_warmup_call_is_first_and_discarded() {
        let backend = RecordingBackend::default();
        let series = LatencySampler::new(3).run(&backend);

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0], (WARMUP_SEQ, WARMUP_VALUE, WARMUP_TAG.to_string()));
        // The warm-up would have reported 1000ns; none of the samples do.
        assert_eq!(series.as_slice(), &[0, 10, 20]);
    }

    #[test]
    fn test_recorded_call_arguments() {
        let backend = RecordingBackend::default();
        LatencySampler::new(5).run(&backend);

        let calls = backend.calls.lock().unwrap();
        for (i, (seq, value, tag)) in calls.iter().skip(1).enumerate() {
            assert_eq!(*seq, i as i32);
            assert!((value - i as f64 * 1.1).abs() < 1e-9);
            assert_eq!(tag, SAMPLE_TAG);
        }
    }

    #[test]
    fn test_default_call_measures_log() {
        struct Sleeper;

        impl LogBackend for Sleeper {
            fn name(&self) -> &str {
                "sleeper"
            }

            fn log(&self, _seq: i32, _value: f64, _tag: &str) {
                std::thread::sleep(Duration::from_micros(100));
            }
        }

        let series = LatencySampler::new(10).run(&Sleeper);
        assert_eq!(series.len(), 10);
        for sample in series.as_slice() {
            assert!(*sample >= 100_000, "Sample {} < 100μs", sample);
        }
    }

    #[test]
    fn test_record_saturates() {
        let mut series = LatencySeries::default();
        series.record(Duration::MAX);
        assert_eq!(series.as_slice(), &[u64::MAX]);
    }

    #[test]
    fn test_sample_value() {
        assert_eq!(sample_value(0), 0.0);
        assert!((sample_value(10) - 11.0).abs() < 1e-9);
    }
}
