//! Setup path resolution.

use crate::models::setup_config::SetupConfig;
use crate::util::path;
use std::path::PathBuf;

/// Every filesystem location the steps touch, derived once from the config.
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub repo: PathBuf,
    pub service: PathBuf,
    pub env_file: PathBuf,
    pub blob_dir: PathBuf,
    pub unit_file: PathBuf,
}

impl SetupPaths {
    /// Derive paths from a config whose `repo_path` is already expanded.
    pub fn from_config(config: &SetupConfig) -> Self {
        let repo = path::normalize(&config.repo_path);
        let service = repo.join(&config.service_subdir);
        let env_file = service.join(&config.env_file_name);
        let blob_dir = path::normalize(&service.join(&config.pds.blobstore_location));
        let unit_file = config.unit.dir.join(config.unit.file_name());
        Self {
            repo,
            service,
            env_file,
            blob_dir,
            unit_file,
        }
    }
}

impl std::fmt::Display for SetupPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pds@{}", self.repo.display())
    }
}
