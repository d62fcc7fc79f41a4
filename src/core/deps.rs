//! Production dependency install and data directory layout.

use crate::constants;
use crate::core::context::SetupContext;
use crate::core::pipeline::StepOutcome;
use crate::core::runner::Invocation;
use crate::util::fs as setup_fs;
use anyhow::{Context, Result};

/// `pnpm install` against the lockfile; it fails if the lockfile is missing
/// or out of date with `package.json`.
pub fn install(ctx: &SetupContext) -> Result<StepOutcome> {
    let service = &ctx.paths.service;
    let cmd = Invocation::new("pnpm")
        .args(["install", "--production", "--frozen-lockfile"])
        .current_dir(service);
    ctx.runner
        .run(&cmd)
        .with_context(|| format!("install dependencies in {}", service.display()))?;

    setup_fs::ensure_dir(&ctx.paths.blob_dir, constants::DATA_DIR_MODE)?;
    tracing::info!(blob_dir = %ctx.paths.blob_dir.display(), "dependencies installed");
    Ok(StepOutcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ThreadSleeper;
    use crate::core::fake::{FakeRunner, FixedPrompt};
    use crate::core::paths::SetupPaths;
    use crate::models::setup_config::SetupConfig;
    use crate::util::privilege::Elevation;
    use tempfile::TempDir;

    #[test]
    fn test_install_then_data_dir() {
        let dir = TempDir::new().unwrap();
        let cfg = SetupConfig {
            repo_path: dir.path().join("pds"),
            ..SetupConfig::default()
        };
        let paths = SetupPaths::from_config(&cfg);
        let runner = FakeRunner::succeeding();
        let ctx = SetupContext {
            config: &cfg,
            paths: &paths,
            runner: &runner,
            prompt: &FixedPrompt("y"),
            sleeper: &ThreadSleeper,
            elevation: Elevation::Direct,
        };

        install(&ctx).unwrap();
        install(&ctx).unwrap();

        let calls = runner.invocations();
        assert_eq!(calls[0].to_string(), "pnpm install --production --frozen-lockfile");
        assert_eq!(calls[0].cwd.as_deref(), Some(paths.service.as_path()));
        assert!(dir.path().join("pds/service/data/blocks").is_dir());
    }

    #[test]
    fn test_install_failure_skips_data_dir() {
        let dir = TempDir::new().unwrap();
        let cfg = SetupConfig {
            repo_path: dir.path().join("pds"),
            ..SetupConfig::default()
        };
        let paths = SetupPaths::from_config(&cfg);
        let runner = FakeRunner::new(|_| FakeRunner::failed(1));
        let ctx = SetupContext {
            config: &cfg,
            paths: &paths,
            runner: &runner,
            prompt: &FixedPrompt("y"),
            sleeper: &ThreadSleeper,
            elevation: Elevation::Direct,
        };
        let err = install(&ctx).unwrap_err();
        assert!(format!("{:#}", err).contains("frozen-lockfile"));
        assert!(!paths.blob_dir.exists());
    }
}
