//! Setup steps and their sequencer.

pub mod config;
pub mod context;
pub mod deps;
pub mod env_file;
pub mod health;
pub mod launcher;
pub mod paths;
pub mod pipeline;
pub mod preflight;
pub mod repo;
pub mod runner;
pub mod secrets;
pub mod unit_gen;

#[cfg(test)]
pub(crate) mod fake;
