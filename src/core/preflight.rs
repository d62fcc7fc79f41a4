//! Preflight: tool availability report and operator confirmation.
//!
//! Read-only. Nothing here mutates state; a declined prompt ends the run
//! before any step executes.

use crate::core::context::{Prompt, SetupContext};
use crate::core::runner::{CommandRunner, Invocation};
use crate::models::setup_config::Requirement;
use anyhow::Result;
use std::fmt::Write as _;

pub const CONFIRM_QUESTION: &str =
    "Press \"y\" and \"enter\" to proceed, else press any key to exit ...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.available { "OK" } else { "ERROR" };
        write!(f, "{} {}", self.name, state)
    }
}

/// Run each verification command in probe mode.
pub fn check_requirements(
    runner: &dyn CommandRunner,
    requirements: &[Requirement],
) -> Vec<ToolStatus> {
    requirements
        .iter()
        .map(|req| {
            let available = Invocation::from_argv(&req.command)
                .and_then(|cmd| runner.probe(&cmd))
                .is_some();
            if !available {
                tracing::warn!(tool = %req.name, "required tool not callable");
            }
            ToolStatus {
                name: req.name.clone(),
                available,
            }
        })
        .collect()
}

/// Requirements plus the deployment targets the run will touch.
pub fn render_report(ctx: &SetupContext, statuses: &[ToolStatus]) -> String {
    let mut out = String::from("Requirements:\n");
    for status in statuses {
        let _ = writeln!(out, "{}", status);
    }
    out.push('\n');
    let _ = writeln!(out, "PDS domain : {}", ctx.config.domain);
    let _ = writeln!(out, "PDS git repo path : {}", ctx.paths.repo.display());
    let _ = writeln!(out, "PDS service .env path : {}", ctx.paths.env_file.display());
    let _ = writeln!(out, "PDS systemd unit path : {}", ctx.paths.unit_file.display());
    out
}

/// Only `y`/`Y` (surrounding whitespace ignored) proceeds.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

pub fn confirm(prompt: &dyn Prompt) -> Result<bool> {
    let answer = prompt.ask(CONFIRM_QUESTION)?;
    Ok(is_affirmative(&answer))
}
