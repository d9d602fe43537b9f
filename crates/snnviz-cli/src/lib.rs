//! snnviz CLI crate
//!
//! Headless host for the spiking network visualizer. Config files, logging
//! setup, progress output and file export live here; the library crates
//! perform no I/O.
//!
//! Commands (see [commands]):
//! - run: drive a `Visualizer` for N frames, log per-cluster spike totals and
//!   optionally export the spike raster as JSON or bincode.
//! - project: build the network and dump every neuron's screen projection for
//!   a camera pose.
//! - init: write a default `snnviz.toml`.
//! - completions: shell completions via clap_complete.
//!
//! The binary (src/main.rs) wires up tracing and argument parsing and calls
//! [`SnnvizCli::execute`].

pub mod commands;
pub mod config;
pub mod error;

pub use commands::SnnvizCli;
