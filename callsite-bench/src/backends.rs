// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Logging backends selectable from the command line.
//!
//! Each tracing backend owns a private `Dispatch`; the timed call enters it
//! before the clock starts, so the harness's own diagnostics never reach the
//! benchmark log and the dispatcher swap is not measured.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use callsite_core::{BackendError, BackendLauncher, LogBackend};
use clap::ValueEnum;
use tracing::{dispatcher, Dispatch, Level};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};

/// Target of every benchmark event.
pub const EVENT_TARGET: &str = "callsite::bench";

/// Name of the background writer thread of the non-blocking backend.
pub const CONSUMER_THREAD: &str = "callsite-log-consumer";

/// Backends the harness can exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BackendKind {
    /// `tracing` fmt layer behind a non-blocking writer with a consumer thread
    Tracing,
    /// `tracing` fmt layer writing to the file on the calling thread
    TracingSync,
    /// Does nothing; measures the cost of the timed call itself
    Noop,
}

impl BackendKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Tracing => "tracing",
            Self::TracingSync => "tracing-sync",
            Self::Noop => "noop",
        }
    }

    /// Benchmark log file written by this backend, if any.
    pub fn log_file_name(&self) -> Option<String> {
        match self {
            Self::Tracing | Self::TracingSync => Some(format!(
                "{}_call_site_latency_percentile_linux_benchmark.log",
                self.name().replace('-', "_")
            )),
            Self::Noop => None,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Starts the selected backend against a log file in `log_dir`.
#[derive(Debug, Clone)]
pub struct Launcher {
    kind: BackendKind,
    log_dir: PathBuf,
}

impl Launcher {
    pub fn new(kind: BackendKind, log_dir: impl AsRef<Path>) -> Self {
        Self {
            kind,
            log_dir: log_dir.as_ref().to_path_buf(),
        }
    }

    /// Full path of the log file, if the backend writes one.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.kind.log_file_name().map(|name| self.log_dir.join(name))
    }
}

impl BackendLauncher for Launcher {
    fn launch(&self) -> Result<Box<dyn LogBackend>, BackendError> {
        let Some(path) = self.log_path() else {
            return Ok(Box::new(NoopBackend));
        };

        remove_log_file(&path)?;
        tracing::info!(backend = %self.kind, path = %path.display(), "Log file cleared");

        match self.kind {
            BackendKind::Tracing => Ok(Box::new(NonBlockingTracing::open(&path)?)),
            BackendKind::TracingSync => Ok(Box::new(BlockingTracing::open(&path)?)),
            BackendKind::Noop => Ok(Box::new(NoopBackend)),
        }
    }
}

/// Delete a previous run's log file. A missing file is fine.
pub fn remove_log_file(path: &Path) -> Result<(), BackendError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BackendError::LogFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create_log_file(path: &Path) -> Result<File, BackendError> {
    File::create(path).map_err(|source| BackendError::LogFile {
        path: path.to_path_buf(),
        source,
    })
}

fn emit(seq: i32, value: f64, tag: &str) {
    tracing::info!(
        target: EVENT_TARGET,
        "Logging str: {}, int: {}, double: {}",
        tag,
        seq,
        value
    );
}

/// Run one event through `dispatch`, timing only the event itself.
fn timed_in(dispatch: &Dispatch, seq: i32, value: f64, tag: &str) -> Duration {
    dispatcher::with_default(dispatch, || {
        let start = Instant::now();
        emit(seq, value, tag);
        start.elapsed()
    })
}

/// Formats on the caller, hands the line to a consumer thread.
pub struct NonBlockingTracing {
    dispatch: Dispatch,
    // Flushes and joins the consumer when dropped.
    _guard: WorkerGuard,
}

impl NonBlockingTracing {
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let file = create_log_file(path)?;

        // Block instead of dropping lines when the queue is full.
        let (writer, guard) = NonBlockingBuilder::default()
            .lossy(false)
            .thread_name(CONSUMER_THREAD)
            .finish(file);

        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .with_thread_names(true)
            .with_max_level(Level::INFO)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            _guard: guard,
        })
    }
}

impl LogBackend for NonBlockingTracing {
    fn name(&self) -> &str {
        BackendKind::Tracing.name()
    }

    fn log(&self, seq: i32, value: f64, tag: &str) {
        dispatcher::with_default(&self.dispatch, || emit(seq, value, tag));
    }

    fn call(&self, seq: i32, value: f64, tag: &str) -> Duration {
        timed_in(&self.dispatch, seq, value, tag)
    }
}

/// Formats and writes on the caller, serialized by a mutex around the file.
pub struct BlockingTracing {
    dispatch: Dispatch,
}

impl BlockingTracing {
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let file = create_log_file(path)?;

        let subscriber = tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_thread_names(true)
            .with_max_level(Level::INFO)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
        })
    }
}

impl LogBackend for BlockingTracing {
    fn name(&self) -> &str {
        BackendKind::TracingSync.name()
    }

    fn log(&self, seq: i32, value: f64, tag: &str) {
        dispatcher::with_default(&self.dispatch, || emit(seq, value, tag));
    }

    fn call(&self, seq: i32, value: f64, tag: &str) -> Duration {
        timed_in(&self.dispatch, seq, value, tag)
    }
}

/// Calibration backend.
pub struct NoopBackend;

impl LogBackend for NoopBackend {
    fn name(&self) -> &str {
        BackendKind::Noop.name()
    }

    fn log(&self, seq: i32, value: f64, tag: &str) {
        std::hint::black_box((seq, value, tag));
    }
}
