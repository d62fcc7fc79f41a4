//! Service start: reload units, enable, restart.

use crate::core::context::SetupContext;
use crate::core::pipeline::StepOutcome;
use crate::util::systemd;
use anyhow::{Context, Result};

pub fn start(ctx: &SetupContext) -> Result<StepOutcome> {
    let unit = &ctx.config.unit.name;
    systemd::daemon_reload(ctx.runner, ctx.elevation).context("reload systemd units")?;
    systemd::enable(ctx.runner, ctx.elevation, unit).with_context(|| format!("enable {}", unit))?;
    systemd::restart(ctx.runner, ctx.elevation, unit).with_context(|| format!("restart {}", unit))?;
    tracing::info!(unit = %unit, "service restarted");
    Ok(StepOutcome::Done)
}
