// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Caller-thread latency benchmark.
//!
//! Runs the fixed scenario set against the backend named on the command line
//! and prints per-thread percentiles to stdout. Diagnostics go to stderr.

use std::io;
use std::sync::Mutex;

use anyhow::Context;
use callsite_bench::{BackendKind, HostInfo, Launcher};
use callsite_core::{AffinityController, BenchmarkConfig, Orchestrator};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Measure caller-side latency of a logging backend from pinned threads
#[derive(Parser)]
#[command(name = "callsite-latency")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logging backend to benchmark
    #[arg(value_enum)]
    backend: BackendKind,
}

fn usage() -> String {
    let names: Vec<&str> = BackendKind::value_variants()
        .iter()
        .map(BackendKind::name)
        .collect();
    format!(
        "Please provide the name of the logger as argument.\nUsage: callsite-latency <{}>",
        names.join("|")
    )
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            // Wrong argument count or unknown backend: not a failure for this tool.
            eprintln!("{}", usage());
            return Ok(());
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = BenchmarkConfig::default();

    let host = HostInfo::collect();
    println!("{}", host);
    host.check_cpu_budget(config.max_threads());

    let log_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let launcher = Launcher::new(cli.backend, log_dir);

    tracing::info!(
        backend = %cli.backend,
        scenarios = ?config.scenario_list(),
        iterations = config.iteration_count(),
        "Starting benchmark"
    );

    let stdout = Mutex::new(io::stdout());
    let mut orchestrator = Orchestrator::new(config, AffinityController::detect());
    orchestrator
        .run(&launcher, &stdout)
        .with_context(|| format!("Benchmark run for '{}' failed", cli.backend))?;

    Ok(())
}
