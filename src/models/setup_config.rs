//! Setup configuration file model.

use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the setup steps read. Built once at startup and passed down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Public hostname written as `PDS_HOSTNAME`.
    pub domain: String,
    pub repo_url: String,
    pub repo_path: PathBuf,
    pub service_subdir: String,
    pub env_file_name: String,
    pub unit: UnitSection,
    pub health: HealthSection,
    pub pds: PdsSection,
    pub requirements: Vec<Requirement>,

    /// Skip the confirmation prompt.
    pub non_interactive: bool,

    /// Exit non-zero when the health check is inconclusive.
    pub strict_health: bool,

    /// Forward step outcomes to journald.
    pub journald: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            domain: constants::DEFAULT_PDS_DOMAIN.to_string(),
            repo_url: constants::DEFAULT_REPO_URL.to_string(),
            repo_path: PathBuf::from(constants::DEFAULT_REPO_PATH),
            service_subdir: constants::DEFAULT_SERVICE_SUBDIR.to_string(),
            env_file_name: constants::DEFAULT_ENV_FILE_NAME.to_string(),
            unit: UnitSection::default(),
            health: HealthSection::default(),
            pds: PdsSection::default(),
            requirements: default_requirements(),
            non_interactive: false,
            strict_health: false,
            journald: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitSection {
    pub name: String,
    pub dir: PathBuf,
    pub description: String,
    pub start_command: String,
    pub wanted_by: String,
}

impl Default for UnitSection {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_UNIT_NAME.to_string(),
            dir: PathBuf::from(constants::DEFAULT_UNIT_DIR),
            description: constants::DEFAULT_UNIT_DESCRIPTION.to_string(),
            start_command: constants::DEFAULT_START_COMMAND.to_string(),
            wanted_by: constants::DEFAULT_WANTED_BY.to_string(),
        }
    }
}

impl UnitSection {
    /// Unit file name, e.g. `pds.service`.
    pub fn file_name(&self) -> String {
        format!("{}.service", self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthSection {
    pub host: String,
    pub path: String,
    pub marker: String,
    pub attempts: u32,
    pub interval_secs: u64,
}

impl Default for HealthSection {
    fn default() -> Self {
        Self {
            host: constants::HEALTH_HOST.to_string(),
            path: constants::HEALTH_PATH.to_string(),
            marker: constants::HEALTH_MARKER.to_string(),
            attempts: constants::HEALTH_MAX_ATTEMPTS,
            interval_secs: constants::HEALTH_INTERVAL_SECS,
        }
    }
}

/// Static settings written next to the generated secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdsSection {
    pub data_directory: String,
    pub blobstore_location: String,
    pub did_plc_url: String,
    pub app_view_url: String,
    pub app_view_did: String,
    pub report_service_url: String,
    pub report_service_did: String,
    pub crawlers: Vec<String>,
    pub log_enabled: bool,
    pub node_env: String,
    pub port: u16,
}

impl Default for PdsSection {
    fn default() -> Self {
        Self {
            data_directory: constants::DEFAULT_DATA_DIRECTORY.to_string(),
            blobstore_location: constants::DEFAULT_BLOBSTORE_LOCATION.to_string(),
            did_plc_url: constants::DEFAULT_DID_PLC_URL.to_string(),
            app_view_url: constants::DEFAULT_APP_VIEW_URL.to_string(),
            app_view_did: constants::DEFAULT_APP_VIEW_DID.to_string(),
            report_service_url: constants::DEFAULT_REPORT_SERVICE_URL.to_string(),
            report_service_did: constants::DEFAULT_REPORT_SERVICE_DID.to_string(),
            crawlers: vec![constants::DEFAULT_CRAWLERS.to_string()],
            log_enabled: true,
            node_env: constants::DEFAULT_NODE_ENV.to_string(),
            port: constants::DEFAULT_PDS_PORT,
        }
    }
}

/// A tool that must be callable, and the command proving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub command: Vec<String>,
}

fn default_requirements() -> Vec<Requirement> {
    constants::DEFAULT_REQUIREMENTS
        .iter()
        .map(|(name, command)| Requirement {
            name: (*name).to_string(),
            command: command.iter().map(|s| (*s).to_string()).collect(),
        })
        .collect()
}
