//! Utility modules for filesystem, privilege, logging and systemd operations.

pub mod fs;
pub mod journald;
pub mod logging;
pub mod path;
pub mod privilege;
pub mod systemd;
pub mod terminal;
