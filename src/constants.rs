//! Centralized defaults for the PDS deployment, paths, and limits.

/// Public hostname the PDS serves.
pub const DEFAULT_PDS_DOMAIN: &str = "pds.example.com";

/// Upstream repository to clone.
pub const DEFAULT_REPO_URL: &str = "https://github.com/bluesky-social/pds";

/// Checkout location; `~` expands to `$HOME`.
pub const DEFAULT_REPO_PATH: &str = "~/pds";

/// Subdirectory of the checkout holding the runnable service.
pub const DEFAULT_SERVICE_SUBDIR: &str = "service";

/// Runtime configuration file name inside the service directory.
pub const DEFAULT_ENV_FILE_NAME: &str = ".env";

/// systemd unit name (without `.service`).
pub const DEFAULT_UNIT_NAME: &str = "pds";

/// System-wide unit directory.
pub const DEFAULT_UNIT_DIR: &str = "/etc/systemd/system";

pub const DEFAULT_UNIT_DESCRIPTION: &str = "atproto personal data server";

pub const DEFAULT_START_COMMAND: &str = "node index.js";

pub const DEFAULT_WANTED_BY: &str = "default.target";

/// Permission mode for the generated `.env` (holds secrets).
pub const ENV_FILE_MODE: u32 = 0o600;

/// Permission mode for the staged unit file.
pub const UNIT_FILE_MODE: u32 = 0o644;

/// Permission mode for newly created data directories.
pub const DATA_DIR_MODE: u32 = 0o755;

/// Random bytes behind the JWT secret (hex doubles the length).
pub const JWT_SECRET_BYTES: usize = 16;

/// Length in bytes of a secp256k1 private scalar.
pub const K256_SCALAR_BYTES: usize = 32;

pub const K256_CURVE_NAME: &str = "secp256k1";

/// Loopback host the health probe targets.
pub const HEALTH_HOST: &str = "127.0.0.1";

pub const HEALTH_PATH: &str = "/xrpc/_health";

/// Substring a healthy response body contains.
pub const HEALTH_MARKER: &str = "\"version\"";

pub const HEALTH_MAX_ATTEMPTS: u32 = 5;

pub const HEALTH_INTERVAL_SECS: u64 = 1;

/// Exit code for a completed run whose health check was inconclusive
/// while `strict_health` is set.
pub const EXIT_DEGRADED: u8 = 3;

/// Exit code reported when an external tool could not be spawned at all.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Tag used for journald forwarding.
pub const JOURNALD_TAG: &str = "pds-setup";

/// Tools checked before any mutation, with the command proving each works.
pub const DEFAULT_REQUIREMENTS: &[(&str, &[&str])] = &[
    ("curl", &["curl", "--version"]),
    ("git", &["git", "--version"]),
    ("node", &["node", "-v"]),
    ("openssl", &["openssl", "version"]),
    ("pnpm", &["pnpm", "-v"]),
];

// Static PDS settings written to the generated `.env`.
pub const DEFAULT_DATA_DIRECTORY: &str = "./data";
pub const DEFAULT_BLOBSTORE_LOCATION: &str = "./data/blocks";
pub const DEFAULT_DID_PLC_URL: &str = "https://plc.directory";
pub const DEFAULT_APP_VIEW_URL: &str = "https://api.bsky.app";
pub const DEFAULT_APP_VIEW_DID: &str = "did:web:api.bsky.app";
pub const DEFAULT_REPORT_SERVICE_URL: &str = "https://mod.bsky.app";
pub const DEFAULT_REPORT_SERVICE_DID: &str = "did:plc:ar7c4by46qjdydhdevvrndac";
pub const DEFAULT_CRAWLERS: &str = "https://bsky.network";
pub const DEFAULT_NODE_ENV: &str = "production";
pub const DEFAULT_PDS_PORT: u16 = 3002;
