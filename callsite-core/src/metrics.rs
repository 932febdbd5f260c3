// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Percentile aggregation over a recorded latency series.

use crate::error::{HarnessError, HarnessResult};
use crate::sampler::LatencySeries;

/// A reported quantile, held exactly as parts per thousand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantile {
    P50,
    P75,
    P90,
    P99,
    P999,
}

impl Quantile {
    /// All reported quantiles, in column order.
    pub const ALL: [Quantile; 5] = [
        Self::P50,
        Self::P75,
        Self::P90,
        Self::P99,
        Self::P999,
    ];

    pub fn per_mille(&self) -> u32 {
        match self {
            Self::P50 => 500,
            Self::P75 => 750,
            Self::P90 => 900,
            Self::P99 => 990,
            Self::P999 => 999,
        }
    }

    /// Index of this quantile in a sorted series of `len` samples:
    /// `floor(len * q)`, clamped to `[0, len - 1]`.
    pub fn index(&self, len: usize) -> usize {
        let raw = (len as u128 * u128::from(self.per_mille())) / 1000;
        let last = len.saturating_sub(1);
        usize::try_from(raw).map_or(last, |idx| idx.min(last))
    }
}

/// Summary statistics over one worker's series, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileReport {
    pub p50_ns: u64,
    pub p75_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
    pub p999_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
}

impl PercentileReport {
    /// Sort the series and derive the report.
    ///
    /// Every recorded sample counts, outliers included.
    pub fn from_series(series: LatencySeries) -> HarnessResult<Self> {
        if series.is_empty() {
            return Err(HarnessError::EmptySeries);
        }

        let mut samples = series.into_samples();
        samples.sort_unstable();
        let len = samples.len();

        let at = |q: Quantile| samples[q.index(len)];
        let sum: u128 = samples.iter().map(|&s| u128::from(s)).sum();

        Ok(Self {
            p50_ns: at(Quantile::P50),
            p75_ns: at(Quantile::P75),
            p90_ns: at(Quantile::P90),
            p99_ns: at(Quantile::P99),
            p999_ns: at(Quantile::P999),
            max_ns: samples[len - 1],
            mean_ns: sum as f64 / len as f64,
        })
    }

    /// Value reported for `q`.
    pub fn quantile(&self, q: Quantile) -> u64 {
        match q {
            Quantile::P50 => self.p50_ns,
            Quantile::P75 => self.p75_ns,
            Quantile::P90 => self.p90_ns,
            Quantile::P99 => self.p99_ns,
            Quantile::P999 => self.p999_ns,
        }
    }
}
