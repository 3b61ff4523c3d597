//! relog: re-emit heterogeneous log streams as normalized, aligned lines.
//!
//! Wires the `relog-core` pipeline to the process edges: command line,
//! TOML configuration, and the console and JSON output sinks.

pub mod cli;
pub mod config;
pub mod output;
