// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Scenario orchestration.
//!
//! Lifecycle: Idle → BackendStarted → Running(t) → ReportPrinted(t) → ... → Done.
//! Each scenario spawns `t` pinned workers inside a thread scope; the end of
//! the scope is the barrier that gates the next scenario.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::affinity::{worker_cpu, AffinityController, CONTROL_CPU};
use crate::backend::{BackendLauncher, LogBackend};
use crate::config::BenchmarkConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::metrics::PercentileReport;
use crate::report::{RunSummary, ScenarioHeader, ScenarioOutcome, ThreadReport};
use crate::sampler::LatencySampler;

/// Orchestrator lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing started yet.
    Idle,

    /// Backend launched and settled.
    BackendStarted,

    /// Workers of the scenario with this thread count are sampling.
    Running(usize),

    /// All reports of the scenario with this thread count are written.
    ReportPrinted(usize),

    /// Last scenario finished.
    Done,
}

impl RunState {
    /// Get the state name for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::BackendStarted => "BackendStarted",
            Self::Running(_) => "Running",
            Self::ReportPrinted(_) => "ReportPrinted",
            Self::Done => "Done",
        }
    }

    /// Check if transition to the target state is valid.
    pub fn can_transition_to(&self, target: RunState) -> bool {
        match (self, target) {
            (Self::Idle, Self::BackendStarted) => true,
            (Self::BackendStarted, Self::Running(_)) => true,
            (Self::Running(a), Self::ReportPrinted(b)) => *a == b,
            (Self::ReportPrinted(_), Self::Running(_)) => true,
            (Self::ReportPrinted(_), Self::Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running(t) | Self::ReportPrinted(t) => write!(f, "{}({})", self.name(), t),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Drives a full benchmark run against one backend.
#[derive(Debug)]
pub struct Orchestrator {
    config: BenchmarkConfig,
    affinity: AffinityController,
    state: RunState,
}

impl Orchestrator {
    pub fn new(config: BenchmarkConfig, affinity: AffinityController) -> Self {
        Self {
            config,
            affinity,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition_to(&mut self, target: RunState) -> HarnessResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(HarnessError::InvalidTransition {
                from: self.state.name(),
                to: target.name(),
            });
        }

        tracing::debug!(from = %self.state, to = %target, "Orchestrator transition");
        self.state = target;
        Ok(())
    }

    /// Launch the backend and run every configured scenario in order.
    ///
    /// Reports are written to `out` under its lock as workers finish. A
    /// panicking backend call is not caught.
    pub fn run<W: Write + Send>(
        &mut self,
        launcher: &dyn BackendLauncher,
        out: &Mutex<W>,
    ) -> HarnessResult<RunSummary> {
        self.config.validate()?;

        // Threads the backend spawns from here inherit the control CPU.
        self.affinity.pin(CONTROL_CPU);
        let backend = launcher.launch()?;

        let settle = self.config.settle();
        tracing::info!(
            backend = backend.name(),
            settle = ?settle,
            "Backend started"
        );
        if !settle.is_zero() {
            thread::sleep(settle);
        }
        self.transition_to(RunState::BackendStarted)?;

        let scenario_list = self.config.scenario_list().to_vec();
        let mut scenarios = Vec::with_capacity(scenario_list.len());

        for thread_count in scenario_list {
            self.transition_to(RunState::Running(thread_count))?;
            let outcome = self.run_scenario(thread_count, backend.as_ref(), out)?;
            self.transition_to(RunState::ReportPrinted(thread_count))?;
            scenarios.push(outcome);
        }

        self.transition_to(RunState::Done)?;

        Ok(RunSummary {
            backend: backend.name().to_string(),
            scenarios,
        })
    }

    fn run_scenario<W: Write + Send>(
        &self,
        thread_count: usize,
        backend: &dyn LogBackend,
        out: &Mutex<W>,
    ) -> HarnessResult<ScenarioOutcome> {
        tracing::info!(threads = thread_count, "Starting scenario");

        write_locked(
            out,
            &ScenarioHeader {
                thread_count,
                backend: backend.name(),
            },
        )?;

        let sampler = LatencySampler::new(self.config.iteration_count());
        let affinity = &self.affinity;

        let reports = thread::scope(|scope| -> HarnessResult<Vec<ThreadReport>> {
            let mut handles = Vec::with_capacity(thread_count);
            for worker in 1..=thread_count {
                let handle = thread::Builder::new()
                    .name(format!("callsite-worker-{}", worker))
                    .spawn_scoped(scope, move || {
                        run_worker(worker, affinity, sampler, backend, out)
                    })
                    .map_err(|source| HarnessError::WorkerSpawn { worker, source })?;
                handles.push(handle);
            }

            let mut reports = Vec::with_capacity(thread_count);
            for handle in handles {
                match handle.join() {
                    Ok(report) => reports.push(report?),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            Ok(reports)
        })?;

        tracing::info!(threads = thread_count, "Scenario complete");

        Ok(ScenarioOutcome {
            thread_count,
            reports,
        })
    }
}

/// Body of one worker thread: pin, sample, aggregate, print.
fn run_worker<W: Write>(
    worker: usize,
    affinity: &AffinityController,
    sampler: LatencySampler,
    backend: &dyn LogBackend,
    out: &Mutex<W>,
) -> HarnessResult<ThreadReport> {
    let pinning = affinity.pin(worker_cpu(worker));
    tracing::debug!(worker = worker, pinning = ?pinning, "Worker sampling");

    let series = sampler.run(backend);
    let report = ThreadReport {
        thread: worker,
        percentiles: PercentileReport::from_series(series)?,
    };

    write_locked(out, &report)?;
    Ok(report)
}

fn write_locked<W: Write>(out: &Mutex<W>, item: &dyn fmt::Display) -> HarnessResult<()> {
    // The writer carries no invariants a panicking holder could break.
    let mut guard = out.lock().unwrap_or_else(PoisonError::into_inner);
    write!(guard, "{}", item)
        .and_then(|()| guard.flush())
        .map_err(|source| HarnessError::Output { source })
}
