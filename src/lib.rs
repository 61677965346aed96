//! Core library for the `stac-perf` CLI.
//!
//! This crate provides the building blocks used by the binary: the random
//! bounding box and time interval generator, Locust metric name
//! normalization, the STAC search load test, statistics exporters, and
//! campaign statistics helpers. The primary user-facing interface is the
//! `stac-perf` command-line application; library APIs may evolve as the CLI
//! grows.
pub mod args;
pub mod config;
pub mod error;
pub mod export;
pub mod gist;
pub mod http;
pub mod loadtest;
pub mod logger;
pub mod naming;
pub mod newsletter;
pub mod sampling;
pub mod shutdown;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
