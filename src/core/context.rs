//! Shared context handed to every setup step.

use crate::core::paths::SetupPaths;
use crate::core::runner::CommandRunner;
use crate::models::setup_config::SetupConfig;
use crate::util::privilege::Elevation;
use anyhow::Result;
use std::time::Duration;

/// Reads the operator's answer to a question.
pub trait Prompt {
    fn ask(&self, question: &str) -> Result<String>;
}

/// Blocks the current thread between health probes.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Explicit inputs for one setup run. Nothing is read from globals.
pub struct SetupContext<'a> {
    pub config: &'a SetupConfig,
    pub paths: &'a SetupPaths,
    pub runner: &'a dyn CommandRunner,
    pub prompt: &'a dyn Prompt,
    pub sleeper: &'a dyn Sleeper,
    pub elevation: Elevation,
}
