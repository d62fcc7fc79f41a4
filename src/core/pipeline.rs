//! Top-level sequencer.
//!
//! Steps run strictly in order. Each returns a [`StepOutcome`]; a fatal
//! failure is an `Err` and stops the run where it is, with no rollback.

use crate::constants;
use crate::core::context::SetupContext;
use crate::core::{deps, env_file, health, launcher, preflight, repo, unit_gen};
use crate::util::journald;
use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// Nothing to do; the artifact already exists.
    Skipped(String),
    /// Finished, but the result could not be confirmed.
    Degraded(String),
}

impl StepOutcome {
    fn label(&self) -> &'static str {
        match self {
            StepOutcome::Done => "done",
            StepOutcome::Skipped(_) => "skipped",
            StepOutcome::Degraded(_) => "degraded",
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            StepOutcome::Done => None,
            StepOutcome::Skipped(d) | StepOutcome::Degraded(d) => Some(d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Repository,
    EnvFile,
    Dependencies,
    Unit,
    Launch,
    Health,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Repository,
        Step::EnvFile,
        Step::Dependencies,
        Step::Unit,
        Step::Launch,
        Step::Health,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::Repository => "repository",
            Step::EnvFile => "env",
            Step::Dependencies => "dependencies",
            Step::Unit => "unit",
            Step::Launch => "launch",
            Step::Health => "health",
        }
    }

    /// Progress line shown to the operator.
    pub fn banner(self) -> &'static str {
        match self {
            Step::Repository => "Cloning/updating pds repository ...",
            Step::EnvFile => "Setting up .env ...",
            Step::Dependencies => "Setting up service ...",
            Step::Unit => "Setting up systemd unit ...",
            Step::Launch => "Starting PDS ...",
            Step::Health => "Checking PDS status ...",
        }
    }

    fn execute(self, ctx: &SetupContext) -> Result<StepOutcome> {
        match self {
            Step::Repository => repo::sync(ctx),
            Step::EnvFile => env_file::ensure(ctx),
            Step::Dependencies => deps::install(ctx),
            Step::Unit => unit_gen::install(ctx),
            Step::Launch => launcher::start(ctx),
            Step::Health => health::check(ctx),
        }
    }
}

/// How a run ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Operator declined; nothing was changed.
    Aborted,
    /// Every step ran. `degraded` is set when health could not be confirmed.
    Completed { degraded: bool },
}

pub fn run(ctx: &SetupContext) -> Result<RunStatus> {
    let statuses = preflight::check_requirements(ctx.runner, &ctx.config.requirements);
    println!("{}", preflight::render_report(ctx, &statuses));

    if ctx.config.non_interactive {
        tracing::info!("non-interactive run; skipping confirmation");
    } else if !preflight::confirm(ctx.prompt)? {
        return Ok(RunStatus::Aborted);
    }

    let mut degraded = false;
    for (index, step) in Step::ALL.into_iter().enumerate() {
        println!("[{}] {}", index + 1, step.banner());
        let outcome = step
            .execute(ctx)
            .with_context(|| format!("step '{}' failed", step.name()))?;
        tracing::info!(
            step = step.name(),
            outcome = outcome.label(),
            detail = ?outcome.detail(),
            "step finished"
        );
        if ctx.config.journald {
            let line = journald::step_line(
                &ctx.config.domain,
                step.name(),
                outcome.label(),
                outcome.detail(),
            );
            journald::forward_line(constants::JOURNALD_TAG, &line);
        }
        if let StepOutcome::Degraded(_) = outcome {
            degraded = true;
        }
    }

    println!("Done!");
    Ok(RunStatus::Completed { degraded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake::{k256_der, FakeRunner, FixedPrompt, RecordingSleeper};
    use crate::core::paths::SetupPaths;
    use crate::core::runner::CommandRunner;
    use crate::models::setup_config::SetupConfig;
    use crate::util::privilege::Elevation;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> SetupConfig {
        let mut cfg = SetupConfig {
            repo_path: dir.path().join("pds"),
            ..SetupConfig::default()
        };
        cfg.unit.dir = dir.path().join("systemd");
        fs::create_dir_all(&cfg.unit.dir).unwrap();
        cfg
    }

    fn healthy_runner() -> FakeRunner {
        let keys = Cell::new(0u8);
        FakeRunner::new(move |inv| match inv.program.as_str() {
            "openssl" if inv.args.first().map(String::as_str) == Some("ecparam") => {
                keys.set(keys.get() + 1);
                FakeRunner::ok_bytes(k256_der(keys.get()))
            }
            "curl" if inv.args.iter().any(|a| a.ends_with("/xrpc/_health")) => {
                FakeRunner::ok(r#"{"version":"0.4.0"}"#)
            }
            _ => FakeRunner::ok(""),
        })
    }

    #[test]
    fn test_declined_prompt_mutates_nothing() {
        let dir = TempDir::new().unwrap();
        let cfg = config_in(&dir);
        let paths = SetupPaths::from_config(&cfg);
        let runner = healthy_runner();
        let sleeper = RecordingSleeper::default();
        for answer in ["n", "", "yes", "q"] {
            let prompt = FixedPrompt(answer);
            let ctx = SetupContext {
                config: &cfg,
                paths: &paths,
                runner: &runner,
                prompt: &prompt,
                sleeper: &sleeper,
                elevation: Elevation::Sudo,
            };
            assert_eq!(run(&ctx).unwrap(), RunStatus::Aborted);
        }
        // Only the five preflight probes per attempt ran.
        assert_eq!(runner.calls().len(), 20);
        assert!(runner
            .invocations()
            .iter()
            .all(|inv| inv.args.len() == 1 && inv.program != "sudo"));
        assert!(!paths.env_file.exists());
        assert!(!paths.unit_file.exists());
        assert!(sleeper.sleeps.borrow().is_empty());
    }

    #[test]
    fn test_full_run_order() {
        let dir = TempDir::new().unwrap();
        let cfg = config_in(&dir);
        let paths = SetupPaths::from_config(&cfg);
        let runner = healthy_runner();
        let sleeper = RecordingSleeper::default();
        let ctx = SetupContext {
            config: &cfg,
            paths: &paths,
            runner: &runner,
            prompt: &FixedPrompt("Y"),
            sleeper: &sleeper,
            elevation: Elevation::Sudo,
        };

        assert_eq!(run(&ctx).unwrap(), RunStatus::Completed { degraded: false });

        let calls = runner.calls();
        let clone = format!("git clone {} {}", constants::DEFAULT_REPO_URL, paths.repo.display());
        let mutating: Vec<&str> = calls[5..]
            .iter()
            .map(String::as_str)
            .filter(|c| !c.starts_with("openssl ecparam") && !c.starts_with("sudo mv"))
            .collect();
        assert_eq!(
            mutating,
            [
                clone.as_str(),
                "pnpm install --production --frozen-lockfile",
                "sudo systemctl daemon-reload",
                "sudo systemctl enable pds",
                "sudo systemctl restart pds",
                "curl --silent http://127.0.0.1:3002/xrpc/_health",
            ]
        );
        assert!(paths.env_file.is_file());
        assert!(paths.blob_dir.is_dir());
    }

    #[test]
    fn test_unhealthy_service_is_degraded_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config_in(&dir);
        cfg.non_interactive = true;
        let paths = SetupPaths::from_config(&cfg);
        let inner = healthy_runner();
        let runner = FakeRunner::new(move |inv| {
            if inv.program == "curl" && inv.args.len() > 1 {
                FakeRunner::failed(7)
            } else {
                inner.execute(inv).unwrap_or_default()
            }
        });
        let sleeper = RecordingSleeper::default();
        let ctx = SetupContext {
            config: &cfg,
            paths: &paths,
            runner: &runner,
            prompt: &FixedPrompt("n"),
            sleeper: &sleeper,
            elevation: Elevation::Direct,
        };

        assert_eq!(run(&ctx).unwrap(), RunStatus::Completed { degraded: true });
        assert_eq!(sleeper.sleeps.borrow().len(), 5);
    }

    #[test]
    fn test_failing_action_step_stops_run() {
        let dir = TempDir::new().unwrap();
        let cfg = config_in(&dir);
        let paths = SetupPaths::from_config(&cfg);
        let inner = healthy_runner();
        let runner = FakeRunner::new(move |inv| {
            if inv.program == "pnpm" && inv.args.first().map(String::as_str) == Some("install") {
                FakeRunner::failed(1)
            } else {
                inner.execute(inv).unwrap_or_default()
            }
        });
        let ctx = SetupContext {
            config: &cfg,
            paths: &paths,
            runner: &runner,
            prompt: &FixedPrompt("y"),
            sleeper: &RecordingSleeper::default(),
            elevation: Elevation::Sudo,
        };
        let err = run(&ctx).unwrap_err();
        assert!(format!("{:#}", err).contains("step 'dependencies' failed"));
        assert!(runner.calls().iter().all(|c| !c.contains("systemctl")));
        assert!(!paths.unit_file.exists());
    }
}
