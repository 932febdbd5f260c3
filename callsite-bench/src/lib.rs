// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Call-Site Latency Benchmark
//!
//! Concrete logging backends and host reporting for the
//! `callsite-latency` binary.
//!
//! # Backends
//!
//! - **tracing**: fmt layer behind a non-blocking writer and consumer thread
//! - **tracing-sync**: fmt layer writing to the file on the calling thread
//! - **noop**: no work at all, the floor of the timed call

pub mod backends;
pub mod host;

pub use backends::{BackendKind, Launcher};
pub use host::HostInfo;
