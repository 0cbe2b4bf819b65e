//! Server-side configuration.
//!
//! Loaded from `/etc/leadbox/<name>.toml` or an explicit path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use leads::{Campaign, DuplicateKeyPolicy};

/// Directory that bare config names resolve into.
const CONFIG_DIR: &str = "/etc/leadbox";

/// Top-level server configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub leads: LeadsConfig,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    /// Seed data for `backend.kind = "memory"`.
    #[serde(default)]
    pub memory_sheets: Vec<MemorySheetConfig>,
}

/// Shared password gate. `password_hash` wins when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// argon2id PHC string.
    #[serde(default)]
    pub password_hash: String,
    /// Plaintext shared password.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HMAC secret for session tokens.
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

fn default_expire_secs() -> u64 {
    43200
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Google,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    /// Service-account key file.
    #[serde(default = "default_credentials")]
    pub credentials: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            credentials: default_credentials(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_credentials() -> PathBuf {
    PathBuf::from("service_account.json")
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadsConfig {
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
}

/// One in-memory sheet: header row plus data rows.
#[derive(Debug, Clone, Deserialize)]
pub struct MemorySheetConfig {
    pub source: String,
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// If `name_or_path` contains `/` or ends with `.toml`, use it as-is.
    /// Otherwise resolve to `/etc/leadbox/<name>.toml`.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.ends_with(".toml") {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("failed to read config file {}: {}", path.display(), e)
        })?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[auth]
password = "sales2024"

[session]
secret = "s3cret"

[backend]
kind = "memory"

[leads]
duplicate_keys = "reject"

[[campaigns]]
name = "Saudi Warm Leads"
source = "https://docs.google.com/spreadsheets/d/abc/edit"

[[campaigns]]
name = "Ohio Warm Leads"
source = ""

[[memory_sheets]]
source = "https://docs.google.com/spreadsheets/d/abc/edit"
header = ["First Name", "Direct Phone Number"]
rows = [["Alex", "555-0101"]]
"#;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/leadbox/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("dev.toml"),
            PathBuf::from("dev.toml")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.auth.password, "sales2024");
        assert!(config.auth.password_hash.is_empty());
        assert_eq!(config.session.expire_secs, 43200);
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.backend.timeout(), Duration::from_secs(30));
        assert_eq!(config.leads.duplicate_keys, DuplicateKeyPolicy::Reject);
        assert_eq!(config.campaigns.len(), 2);
        assert_eq!(config.campaigns[0].name, "Saudi Warm Leads");
        assert_eq!(config.memory_sheets[0].rows[0][1], "555-0101");
    }

    #[test]
    fn test_backend_defaults() {
        let config: ServerConfig = toml::from_str("[session]\nsecret = \"x\"\n").unwrap();
        assert_eq!(config.backend.kind, BackendKind::Google);
        assert_eq!(config.backend.credentials, PathBuf::from("service_account.json"));
        assert_eq!(config.leads.duplicate_keys, DuplicateKeyPolicy::FirstMatch);
        assert!(config.campaigns.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
