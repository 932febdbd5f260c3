// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Host description printed ahead of the results.

use std::fmt;

use sysinfo::System;

/// Machine the benchmark runs on.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub os: String,
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub logical_cpus: usize,
}

impl HostInfo {
    /// Collect current host information.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();

        Self {
            os: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            logical_cpus: num_cpus::get(),
        }
    }

    /// CPUs a run with `max_threads` workers pins to: the control CPU plus one per worker.
    pub fn cpus_required(max_threads: usize) -> usize {
        max_threads + 1
    }

    /// Whether every worker of the largest scenario gets its own CPU.
    /// Logs a warning when it does not; the run goes ahead unpinned.
    pub fn check_cpu_budget(&self, max_threads: usize) -> bool {
        let required = Self::cpus_required(max_threads);
        if required > self.logical_cpus {
            tracing::warn!(
                required = required,
                available = self.logical_cpus,
                "Not enough CPUs to pin every worker, some threads will run unpinned"
            );
            return false;
        }
        true
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Host: {} (kernel {}) - {} - {} logical CPUs",
            self.os,
            self.kernel_version.as_deref().unwrap_or("unknown"),
            self.cpu_model,
            self.logical_cpus
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(cpus: usize) -> HostInfo {
        HostInfo {
            os: "Linux".to_string(),
            kernel_version: Some("6.1.0".to_string()),
            cpu_model: "Test CPU".to_string(),
            logical_cpus: cpus,
        }
    }

    #[test]
    fn test_host_info_collect() {
        let info = HostInfo::collect();
        assert!(!info.os.is_empty());
        assert!(info.logical_cpus > 0);
    }

    #[test]
    fn test_cpu_budget() {
        assert!(host(8).check_cpu_budget(4));
        assert!(host(5).check_cpu_budget(4));
        assert!(!host(4).check_cpu_budget(4));
    }

    #[test]
    fn test_display() {
        let line = host(16).to_string();
        assert_eq!(
            line,
            "Host: Linux (kernel 6.1.0) - Test CPU - 16 logical CPUs"
        );
    }
}
