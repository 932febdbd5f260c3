// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Fixed-width text rendering of scenario results.

use std::fmt;

use crate::metrics::PercentileReport;

/// One worker's result within a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadReport {
    /// 1-based worker index.
    pub thread: usize,
    pub percentiles: PercentileReport,
}

impl fmt::Display for ThreadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.percentiles;
        writeln!(
            f,
            "Thread: {}{:>12}{:>20}{:>20}{:>19}{:>20}{:>20}{:>20}",
            self.thread, "50th", "75th", "90th", "99th", "99.9th", "Worst", "Average"
        )?;
        writeln!(
            f,
            "{:>20}{:>20}{:>20}{:>20}{:>20}{:>20}{:>20.2}",
            p.p50_ns, p.p75_ns, p.p90_ns, p.p99_ns, p.p999_ns, p.max_ns, p.mean_ns
        )?;
        writeln!(f)
    }
}

/// Results of one scenario, ordered by worker index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub thread_count: usize,
    pub reports: Vec<ThreadReport>,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub backend: String,
    pub scenarios: Vec<ScenarioOutcome>,
}

/// Header written before a scenario's workers start.
pub struct ScenarioHeader<'a> {
    pub thread_count: usize,
    pub backend: &'a str,
}

impl fmt::Display for ScenarioHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "********************************* ")?;
        writeln!(
            f,
            "Total thread count: {} - Logger: {} - Benchmark: Caller Thread Latency in nanoseconds ",
            self.thread_count, self.backend
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ThreadReport {
        ThreadReport {
            thread: 3,
            percentiles: PercentileReport {
                p50_ns: 20,
                p75_ns: 30,
                p90_ns: 30,
                p99_ns: 30,
                p999_ns: 30,
                max_ns: 30,
                mean_ns: 16.25,
            },
        }
    }

    #[test]
    fn test_thread_report_layout() {
        let text = sample_report().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Thread: 3"));
        assert!(lines[0].ends_with("Average"));
        for title in ["50th", "75th", "90th", "99th", "99.9th", "Worst"] {
            assert!(lines[0].contains(title), "missing column {}", title);
        }

        // Seven right-aligned columns of width 20
        assert_eq!(lines[1].len(), 140);
        assert_eq!(&lines[1][..20], format!("{:>20}", 20));
        assert!(lines[1].ends_with("16.25"));
        assert!(lines[2].is_empty());
    }

    #[test]
    fn test_scenario_header() {
        let header = ScenarioHeader {
            thread_count: 4,
            backend: "tracing",
        }
        .to_string();

        assert!(header.starts_with("*********************************"));
        assert!(header.contains("Total thread count: 4 - Logger: tracing"));
        assert!(header.contains("in nanoseconds"));
    }
}
