//! Optional journald forwarding via systemd-cat.
//!
//! Best-effort: failure to forward must not break the setup run.

use std::io::Write;
use std::process::{Command, Stdio};

/// Render a step outcome as one JSON line. Never carries secret values.
pub fn step_line(host: &str, step: &str, outcome: &str, detail: Option<&str>) -> String {
    serde_json::json!({
        "host": host,
        "step": step,
        "outcome": outcome,
        "detail": detail,
    })
    .to_string()
}

/// Forward a single log line to journald using `systemd-cat`.
pub fn forward_line(tag: &str, line: &str) {
    let mut child = match Command::new("systemd-cat")
        .arg("-t")
        .arg(tag)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "systemd-cat unavailable");
            return;
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(line.as_bytes());
        let _ = stdin.write_all(b"\n");
    }

    let _ = child.wait();
}
