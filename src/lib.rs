//! One-shot provisioning for an atproto personal data server (PDS).
//!
//! Clones the PDS repository, generates its secrets and `.env`, installs
//! dependencies, registers a systemd unit, starts it and polls the health
//! endpoint. Every step is idempotent or skip-if-exists.
//!
//! ## Modules
//! - `cli`: Argument parsing and exit-code mapping
//! - `core`: The setup steps and their sequencer
//! - `models`: Configuration data structures
//! - `util`: Process, filesystem, privilege and logging helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;

use crate::core::runner::CommandError;

/// Map a fatal error to the process exit code.
///
/// A failed external command propagates its own exit code, and a tool that
/// could not be spawned exits with 127. Anything else exits with 1.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<CommandError>())
        .map(|e| u8::try_from(e.exit_code()).unwrap_or(1))
        .filter(|code| *code != 0)
        .unwrap_or(1)
}
