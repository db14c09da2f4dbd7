//! Core library for the `framescope` CLI.
//!
//! Collects rendering (`dumpsys gfxinfo`) and input-latency (`atrace`) traces
//! from an Android device over repeated trials, parses the diagnostic dumps
//! into typed samples, and reduces them into trimmed summary statistics that
//! report sinks persist. The `framescope` binary drives these pieces from the
//! command line.
pub mod args;
pub mod collector;
pub mod config;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod sample;
pub mod session;
pub mod shell;
pub mod sinks;
pub mod stats;
