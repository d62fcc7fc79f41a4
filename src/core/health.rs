//! Health polling against the local PDS endpoint.
//!
//! Probe mode: a failed attempt never aborts the run. After the loop the
//! captured body decides between healthy and a soft "check manually" report.

use crate::core::context::{SetupContext, Sleeper};
use crate::core::pipeline::StepOutcome;
use crate::core::runner::{CommandRunner, Invocation};
use crate::models::setup_config::SetupConfig;
use anyhow::Result;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HealthProbe {
    /// Full probe URL, scheme included.
    pub url: String,
    pub marker: String,
    pub attempts: u32,
    pub interval: Duration,
}

impl HealthProbe {
    pub fn from_context(ctx: &SetupContext) -> Self {
        Self::from_config(ctx.config)
    }

    pub fn from_config(config: &SetupConfig) -> Self {
        let health = &config.health;
        Self {
            url: format!("http://{}:{}{}", health.host, config.pds.port, health.path),
            marker: health.marker.clone(),
            attempts: health.attempts,
            interval: Duration::from_secs(health.interval_secs),
        }
    }

    /// Host, port and path without the scheme, as shown to the operator.
    pub fn address(&self) -> &str {
        self.url.trim_start_matches("http://")
    }

    fn invocation(&self) -> Invocation {
        Invocation::new("curl").args(["--silent", self.url.as_str()])
    }
}

/// How the polling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub attempts: u32,
    /// Body of the first successful probe, if any.
    pub body: Option<String>,
}

impl PollReport {
    pub fn is_healthy(&self, marker: &str) -> bool {
        self.body.as_deref().is_some_and(|body| body.contains(marker))
    }
}

/// Sleep, probe, repeat until a probe succeeds or attempts run out.
pub fn poll(runner: &dyn CommandRunner, sleeper: &dyn Sleeper, probe: &HealthProbe) -> PollReport {
    let cmd = probe.invocation();
    let mut attempts = 0;
    while attempts < probe.attempts {
        sleeper.sleep(probe.interval);
        attempts += 1;
        if let Some(captured) = runner.probe(&cmd) {
            return PollReport {
                attempts,
                body: Some(captured.stdout_lossy()),
            };
        }
        println!("Retrying ({}) ...", attempts);
    }
    PollReport { attempts, body: None }
}

/// Step 7.
pub fn check(ctx: &SetupContext) -> Result<StepOutcome> {
    let probe = HealthProbe::from_context(ctx);
    let report = poll(ctx.runner, ctx.sleeper, &probe);
    tracing::debug!(
        attempts = report.attempts,
        responded = report.body.is_some(),
        "health poll finished"
    );

    if report.is_healthy(&probe.marker) {
        return Ok(StepOutcome::Done);
    }

    println!("Cannot check PDS status.");
    println!("Navigate to {} to check status.", probe.address());
    let reason = match report.body {
        Some(_) => format!("{} responded without {}", probe.url, probe.marker),
        None => format!("{} unreachable after {} attempts", probe.url, report.attempts),
    };
    Ok(StepOutcome::Degraded(reason))
}
