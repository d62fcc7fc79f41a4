//! The PDS runtime configuration (`service/.env`).
//!
//! Written once with fresh secrets and never regenerated or merged. Keys are
//! emitted in a fixed order: identity and secrets first, then a blank line,
//! then storage, federation and runtime settings.

use crate::constants;
use crate::core::context::SetupContext;
use crate::core::pipeline::StepOutcome;
use crate::core::secrets::GeneratedSecrets;
use crate::models::setup_config::SetupConfig;
use crate::util::fs as setup_fs;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Every key the generated file contains, in file order.
pub const ENV_KEYS: [&str; 15] = [
    "PDS_HOSTNAME",
    "PDS_JWT_SECRET",
    "PDS_ADMIN_PASSWORD",
    "PDS_PLC_ROTATION_KEY_K256_PRIVATE_KEY_HEX",
    "PDS_DATA_DIRECTORY",
    "PDS_BLOBSTORE_DISK_LOCATION",
    "PDS_DID_PLC_URL",
    "PDS_BSKY_APP_VIEW_URL",
    "PDS_BSKY_APP_VIEW_DID",
    "PDS_REPORT_SERVICE_URL",
    "PDS_REPORT_SERVICE_DID",
    "PDS_CRAWLERS",
    "LOG_ENABLED",
    "NODE_ENV",
    "PDS_PORT",
];

/// Step 3: create `.env` unless it already exists.
pub fn ensure(ctx: &SetupContext) -> Result<StepOutcome> {
    let path = &ctx.paths.env_file;
    if path.exists() {
        warn_missing_keys(path);
        return Ok(StepOutcome::Skipped(format!("{} already exists", path.display())));
    }

    let secrets = GeneratedSecrets::generate(ctx.runner)?;
    let content = render(ctx.config, &secrets);
    if let Some(parent) = path.parent() {
        setup_fs::ensure_dir(parent, constants::DATA_DIR_MODE)?;
    }
    setup_fs::write_atomic(path, content.as_bytes(), constants::ENV_FILE_MODE)
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote PDS environment");
    Ok(StepOutcome::Done)
}

/// Render the file. The returned buffer is zeroed on drop.
pub fn render(config: &SetupConfig, secrets: &GeneratedSecrets) -> Zeroizing<String> {
    let pds = &config.pds;
    let port = pds.port.to_string();
    let crawlers = pds.crawlers.join(",");
    let log_enabled = pds.log_enabled.to_string();

    let head: [(&str, &str); 4] = [
        ("PDS_HOSTNAME", config.domain.as_str()),
        ("PDS_JWT_SECRET", secrets.jwt_secret.as_str()),
        ("PDS_ADMIN_PASSWORD", secrets.admin_password.as_str()),
        ("PDS_PLC_ROTATION_KEY_K256_PRIVATE_KEY_HEX", secrets.rotation_key.as_str()),
    ];
    let tail: [(&str, &str); 11] = [
        ("PDS_DATA_DIRECTORY", pds.data_directory.as_str()),
        ("PDS_BLOBSTORE_DISK_LOCATION", pds.blobstore_location.as_str()),
        ("PDS_DID_PLC_URL", pds.did_plc_url.as_str()),
        ("PDS_BSKY_APP_VIEW_URL", pds.app_view_url.as_str()),
        ("PDS_BSKY_APP_VIEW_DID", pds.app_view_did.as_str()),
        ("PDS_REPORT_SERVICE_URL", pds.report_service_url.as_str()),
        ("PDS_REPORT_SERVICE_DID", pds.report_service_did.as_str()),
        ("PDS_CRAWLERS", crawlers.as_str()),
        ("LOG_ENABLED", log_enabled.as_str()),
        ("NODE_ENV", pds.node_env.as_str()),
        ("PDS_PORT", port.as_str()),
    ];

    let mut out = Zeroizing::new(String::new());
    for (key, value) in head {
        push_pair(&mut out, key, value);
    }
    out.push('\n');
    for (key, value) in tail {
        push_pair(&mut out, key, value);
    }
    out
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str("=\"");
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push_str("\"\n");
}

/// Keys present in an env file's content, in order. Values are not kept.
pub fn parse_keys(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, _)| key.trim().to_string())
        .collect()
}

/// Documented keys absent from `content`.
pub fn missing_keys(content: &str) -> Vec<&'static str> {
    let present = parse_keys(content);
    ENV_KEYS
        .iter()
        .copied()
        .filter(|key| !present.iter().any(|p| p == key))
        .collect()
}

fn warn_missing_keys(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => {
            let content = Zeroizing::new(content);
            let missing = missing_keys(&content);
            if !missing.is_empty() {
                tracing::warn!(
                    path = %path.display(),
                    missing = %missing.join(", "),
                    "existing PDS environment lacks documented keys; leaving it unchanged"
                );
            }
        }
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "cannot read existing PDS environment"
        ),
    }
}
