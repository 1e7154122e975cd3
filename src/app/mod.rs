//! Application wiring: CLI, configuration and startup

pub mod cli;
pub mod config;
pub mod startup;
