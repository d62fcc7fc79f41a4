//! systemd unit generation and installation.

use crate::constants;
use crate::core::context::SetupContext;
use crate::core::pipeline::StepOutcome;
use crate::util::{fs as setup_fs, systemd};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Values embedded in the unit file.
#[derive(Debug, Clone)]
pub struct UnitSpec<'a> {
    pub description: &'a str,
    pub working_directory: &'a Path,
    pub exec_start: &'a str,
    pub environment_file: &'a Path,
    pub wanted_by: &'a str,
}

impl<'a> UnitSpec<'a> {
    pub fn from_context(ctx: &'a SetupContext) -> Self {
        Self {
            description: &ctx.config.unit.description,
            working_directory: &ctx.paths.service,
            exec_start: &ctx.config.unit.start_command,
            environment_file: &ctx.paths.env_file,
            wanted_by: &ctx.config.unit.wanted_by,
        }
    }
}

/// Render the unit file (pure function).
pub fn render_unit(spec: &UnitSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[Unit]");
    let _ = writeln!(out, "Description={}", spec.description);
    out.push('\n');
    let _ = writeln!(out, "[Service]");
    let _ = writeln!(out, "WorkingDirectory={}", spec.working_directory.display());
    let _ = writeln!(out, "ExecStart={}", spec.exec_start);
    let _ = writeln!(out, "Restart=on-failure");
    let _ = writeln!(out, "EnvironmentFile={}", spec.environment_file.display());
    out.push('\n');
    let _ = writeln!(out, "[Install]");
    let _ = writeln!(out, "WantedBy={}", spec.wanted_by);
    out
}

/// Step 5: stage the unit in a temp directory, then move it into place with
/// elevated privileges. Skipped when the unit is already installed.
pub fn install(ctx: &SetupContext) -> Result<StepOutcome> {
    let target = &ctx.paths.unit_file;
    if target.exists() {
        return Ok(StepOutcome::Skipped(format!("{} already exists", target.display())));
    }

    let content = render_unit(&UnitSpec::from_context(ctx));
    let staging = tempfile::TempDir::new().context("create unit staging directory")?;
    let staged = staging.path().join(ctx.config.unit.file_name());
    fs::write(&staged, content).with_context(|| format!("write {}", staged.display()))?;
    setup_fs::set_permissions(&staged, constants::UNIT_FILE_MODE)?;

    systemd::install_file(ctx.runner, ctx.elevation, &staged, target)
        .with_context(|| format!("install unit to {}", target.display()))?;
    tracing::info!(unit = %target.display(), "unit installed");
    Ok(StepOutcome::Done)
}
