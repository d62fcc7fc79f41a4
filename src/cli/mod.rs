//! Command-line entry point.

use crate::constants;
use crate::core::config::{self, Overrides};
use crate::core::context::{SetupContext, ThreadSleeper};
use crate::core::paths::SetupPaths;
use crate::core::pipeline::{self, RunStatus};
use crate::core::runner::SystemRunner;
use crate::util::privilege::Elevation;
use crate::util::terminal::TerminalPrompt;
use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pds-setup", version, about = "Provision an atproto personal data server")]
pub struct Cli {
    /// TOML file overriding built-in defaults
    #[arg(long, value_name = "PATH", env = "PDS_SETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Public hostname of the PDS
    #[arg(long, env = "PDS_DOMAIN")]
    pub domain: Option<String>,

    /// Where the PDS repository is checked out
    #[arg(long, value_name = "PATH", env = "PDS_REPO_PATH")]
    pub repo_path: Option<PathBuf>,

    /// Run without the confirmation prompt (suitable for automation)
    #[arg(long, env = "PDS_SETUP_NON_INTERACTIVE", value_parser = BoolishValueParser::new())]
    pub non_interactive: bool,

    /// Exit with status 3 when the health check cannot confirm the service
    #[arg(long, env = "PDS_SETUP_STRICT_HEALTH", value_parser = BoolishValueParser::new())]
    pub strict_health: bool,
}

impl Cli {
    pub fn run(self) -> Result<ExitCode> {
        let home = env::var_os("HOME").map(PathBuf::from);
        let overrides = Overrides {
            domain: self.domain,
            repo_path: self.repo_path,
            non_interactive: self.non_interactive,
            strict_health: self.strict_health,
        };
        let config = config::resolve(self.config.as_deref(), overrides, home.as_deref())?;
        let paths = SetupPaths::from_config(&config);
        tracing::debug!(target_paths = %paths, "resolved setup paths");

        let ctx = SetupContext {
            config: &config,
            paths: &paths,
            runner: &SystemRunner,
            prompt: &TerminalPrompt,
            sleeper: &ThreadSleeper,
            elevation: Elevation::detect(),
        };

        let status = pipeline::run(&ctx)?;
        Ok(ExitCode::from(exit_status(&status, config.strict_health)))
    }
}

/// Exit status for a run that did not fail fatally.
pub fn exit_status(status: &RunStatus, strict_health: bool) -> u8 {
    match status {
        RunStatus::Completed { degraded: true } if strict_health => constants::EXIT_DEGRADED,
        RunStatus::Aborted | RunStatus::Completed { .. } => 0,
    }
}
