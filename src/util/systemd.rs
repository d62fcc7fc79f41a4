use crate::core::runner::{CommandError, CommandRunner, Invocation};
use crate::util::privilege::Elevation;

pub fn daemon_reload(runner: &dyn CommandRunner, elevation: Elevation) -> Result<(), CommandError> {
    systemctl(runner, elevation, &["daemon-reload"])
}

pub fn enable(
    runner: &dyn CommandRunner,
    elevation: Elevation,
    unit: &str,
) -> Result<(), CommandError> {
    systemctl(runner, elevation, &["enable", unit])
}

pub fn restart(
    runner: &dyn CommandRunner,
    elevation: Elevation,
    unit: &str,
) -> Result<(), CommandError> {
    systemctl(runner, elevation, &["restart", unit])
}

/// Move a staged file into a privileged location.
pub fn install_file(
    runner: &dyn CommandRunner,
    elevation: Elevation,
    staged: &std::path::Path,
    target: &std::path::Path,
) -> Result<(), CommandError> {
    let cmd = Invocation::new("mv").path_arg(staged).path_arg(target);
    runner.run(&elevation.wrap(cmd)).map(|_| ())
}

fn systemctl(
    runner: &dyn CommandRunner,
    elevation: Elevation,
    args: &[&str],
) -> Result<(), CommandError> {
    let cmd = Invocation::new("systemctl").args(args.iter().copied());
    runner.run(&elevation.wrap(cmd)).map(|_| ())
}
