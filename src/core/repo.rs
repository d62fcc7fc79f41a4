//! Repository checkout: clone when missing, pull otherwise.

use crate::core::context::SetupContext;
use crate::core::pipeline::StepOutcome;
use crate::core::runner::Invocation;
use anyhow::{Context, Result};

pub fn sync(ctx: &SetupContext) -> Result<StepOutcome> {
    let repo = &ctx.paths.repo;

    // A partial clone left by an interrupted run looks like an existing
    // checkout; `git pull` then fails and the operator removes the directory.
    if repo.exists() {
        let pull = Invocation::new("git").arg("pull").current_dir(repo);
        ctx.runner
            .run(&pull)
            .with_context(|| format!("update repository {}", repo.display()))?;
        tracing::info!(path = %repo.display(), "repository updated");
        return Ok(StepOutcome::Done);
    }

    let clone = Invocation::new("git")
        .arg("clone")
        .arg(ctx.config.repo_url.as_str())
        .path_arg(repo);
    ctx.runner
        .run(&clone)
        .with_context(|| format!("clone {} into {}", ctx.config.repo_url, repo.display()))?;
    tracing::info!(path = %repo.display(), "repository cloned");
    Ok(StepOutcome::Done)
}
