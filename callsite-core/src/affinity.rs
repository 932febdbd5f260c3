// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CPU pinning for the control thread and the sampling workers.
//!
//! CPU 0 hosts the control thread and anything the backend spawns from it.
//! Worker `i` (1-based) runs on CPU `i`.

/// CPU shared by the control thread and the backend consumer.
pub const CONTROL_CPU: usize = 0;

/// CPU assigned to the 1-based worker index.
pub fn worker_cpu(worker: usize) -> usize {
    worker
}

/// Outcome of a pin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pinning {
    /// The calling thread now runs only on this CPU.
    Pinned(usize),
    /// The thread runs on the CPUs the process started with.
    Unsupported,
}

/// Pinning capability, selected once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffinityController {
    /// The platform can restrict a thread to one CPU. `original` is the
    /// mask in force before anything was pinned; a refused pin falls back
    /// to it instead of whatever the thread inherited.
    Supported { original: Vec<usize> },
    /// Every pin request is a no-op.
    Unsupported,
}

impl AffinityController {
    /// Pick the variant for the running platform.
    ///
    /// Must run before the control thread is pinned, so that the captured
    /// mask is the unrestricted one.
    pub fn detect() -> Self {
        if !cfg!(any(target_os = "linux", target_os = "android")) {
            return Self::Unsupported;
        }

        match current_mask() {
            Ok(original) => {
                tracing::debug!(cpus = ?original, "Original CPU mask captured");
                Self::Supported { original }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot read CPU mask, pinning disabled");
                Self::Unsupported
            }
        }
    }

    /// Restrict the calling thread to `cpu`.
    ///
    /// Never fails: a request the kernel refuses is logged, the thread is
    /// put back on the original mask and [`Pinning::Unsupported`] is returned.
    pub fn pin(&self, cpu: usize) -> Pinning {
        match self {
            Self::Unsupported => Pinning::Unsupported,
            Self::Supported { original } => match set_mask(&[cpu]) {
                Ok(()) => {
                    tracing::debug!(cpu = cpu, "Thread pinned to CPU");
                    Pinning::Pinned(cpu)
                }
                Err(e) => {
                    // An inherited mask (e.g. the control CPU) must not stick.
                    if let Err(restore) = set_mask(original) {
                        tracing::warn!(error = %restore, "Failed to restore original CPU mask");
                    }
                    tracing::warn!(cpu = cpu, error = %e, "CPU pinning refused, continuing unpinned");
                    Pinning::Unsupported
                }
            },
        }
    }
}

impl Default for AffinityController {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
type MaskError = nix::Error;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
type MaskError = std::io::Error;

/// CPUs the calling thread may currently run on.
#[cfg(any(target_os = "linux", target_os = "android"))]
fn current_mask() -> Result<Vec<usize>, MaskError> {
    use nix::sched::{sched_getaffinity, CpuSet};
    use nix::unistd::Pid;

    // Pid 0 targets the calling thread, not the whole process.
    let cpuset = sched_getaffinity(Pid::from_raw(0))?;
    Ok((0..CpuSet::count())
        .filter(|&cpu| cpuset.is_set(cpu).unwrap_or(false))
        .collect())
}

/// Restrict the calling thread to `cpus`.
#[cfg(any(target_os = "linux", target_os = "android"))]
fn set_mask(cpus: &[usize]) -> Result<(), MaskError> {
    use nix::sched::{sched_setaffinity, CpuSet};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    for &cpu in cpus {
        cpuset.set(cpu)?;
    }
    sched_setaffinity(Pid::from_raw(0), &cpuset)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn current_mask() -> Result<Vec<usize>, MaskError> {
    Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn set_mask(_cpus: &[usize]) -> Result<(), MaskError> {
    Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_cpu_mapping() {
        assert_eq!(worker_cpu(1), 1);
        assert_eq!(worker_cpu(4), 4);
        assert_ne!(worker_cpu(1), CONTROL_CPU);
    }

    #[test]
    fn test_unsupported_is_noop() {
        let controller = AffinityController::Unsupported;
        assert_eq!(controller.pin(0), Pinning::Unsupported);
        assert_eq!(controller.pin(3), Pinning::Unsupported);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detect_captures_mask_on_linux() {
        match AffinityController::detect() {
            AffinityController::Supported { original } => assert!(!original.is_empty()),
            AffinityController::Unsupported => panic!("Linux should support pinning"),
        }
    }

    #[test]
    fn test_pin_to_control_cpu() {
        // Runs on its own thread so the test runner's mask is untouched.
        let outcome = std::thread::spawn(|| AffinityController::detect().pin(CONTROL_CPU))
            .join()
            .unwrap();

        // Restricted environments may refuse the mask; that must not panic.
        match outcome {
            Pinning::Pinned(cpu) => assert_eq!(cpu, CONTROL_CPU),
            Pinning::Unsupported => println!("Pinning unavailable in this environment"),
        }
    }

    #[test]
    fn test_out_of_range_cpu_degrades() {
        let outcome = std::thread::spawn(|| AffinityController::detect().pin(1 << 20))
            .join()
            .unwrap();
        assert_eq!(outcome, Pinning::Unsupported);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_refused_pin_restores_original_mask() {
        let child_mask = std::thread::spawn(|| {
            // Captured before the control pin, as the orchestrator does.
            let controller = AffinityController::detect();
            let AffinityController::Supported { original } = controller.clone() else {
                panic!("Linux should support pinning");
            };

            // Restricted environments may refuse even CPU 0.
            if controller.pin(CONTROL_CPU) == Pinning::Unsupported {
                return None;
            }

            let worker = std::thread::spawn(move || {
                let outcome = controller.pin(1 << 20);
                (outcome, current_mask().unwrap())
            })
            .join()
            .unwrap();

            Some((original, worker))
        })
        .join()
        .unwrap();

        if let Some((original, (outcome, mask))) = child_mask {
            assert_eq!(outcome, Pinning::Unsupported);
            // Not left on the control CPU it inherited from its parent.
            assert_eq!(mask, original);
        }
    }
}
