//! Loading and layering of [`SetupConfig`].
//!
//! Precedence: command-line flag or its environment variable, then the TOML
//! config file, then built-in defaults.

use crate::models::setup_config::SetupConfig;
use crate::util::path;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Values supplied on the command line (or their env vars).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub domain: Option<String>,
    pub repo_path: Option<PathBuf>,
    pub non_interactive: bool,
    pub strict_health: bool,
}

pub fn load(path: &Path) -> Result<SetupConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read setup config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse setup config {}", path.display()))
}

pub fn resolve(
    config_file: Option<&Path>,
    overrides: Overrides,
    home: Option<&Path>,
) -> Result<SetupConfig> {
    let mut config = match config_file {
        Some(path) => load(path)?,
        None => SetupConfig::default(),
    };

    if let Some(domain) = overrides.domain {
        config.domain = domain;
    }
    if let Some(repo_path) = overrides.repo_path {
        config.repo_path = repo_path;
    }
    config.non_interactive |= overrides.non_interactive;
    config.strict_health |= overrides.strict_health;

    config.repo_path = path::expand_home(&config.repo_path, home);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &SetupConfig) -> Result<()> {
    if config.domain.trim().is_empty() {
        anyhow::bail!("domain cannot be empty");
    }
    if config.health.attempts == 0 {
        anyhow::bail!("health.attempts must be at least 1");
    }
    if config.unit.name.is_empty() || config.unit.name.contains('/') {
        anyhow::bail!("invalid unit name '{}'", config.unit.name);
    }
    if !config.repo_path.is_absolute() {
        tracing::warn!(
            repo_path = %config.repo_path.display(),
            "repo_path is relative; it resolves against the current directory"
        );
    }
    Ok(())
}
