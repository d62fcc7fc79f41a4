//! Privilege checks and sudo elevation for system-wide operations.

use crate::core::runner::Invocation;

/// Check if the current process is running as root (euid 0).
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// How privileged commands (unit install, systemctl) are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Already root: run the command as-is.
    Direct,
    /// Prefix the command with `sudo`.
    Sudo,
}

impl Elevation {
    pub fn detect() -> Self {
        if is_root() {
            Elevation::Direct
        } else {
            Elevation::Sudo
        }
    }

    pub fn wrap(self, invocation: Invocation) -> Invocation {
        match self {
            Elevation::Direct => invocation,
            Elevation::Sudo => {
                let mut args = Vec::with_capacity(invocation.args.len() + 1);
                args.push(invocation.program);
                args.extend(invocation.args);
                Invocation {
                    program: "sudo".to_string(),
                    args,
                    cwd: invocation.cwd,
                }
            }
        }
    }
}
