//! CLI command handlers

pub mod commands;

pub use commands::{detail, inspect, pareto, resolve};
