//! Bootstrap: first-start checks and construction of the injected services.
//!
//! When leadboxd starts:
//! 1. Verify the config has a password, a session secret and campaigns.
//! 2. Pick the password provider.
//! 3. Build the sheet backend once; every request shares it.

use std::sync::Arc;

use tracing::info;

use leadbox_core::{Argon2Password, AuthProvider, SharedPassword};
use leadbox_sheet::{
    GoogleSheetsBackend, GoogleSheetsConfig, MemoryBackend, MemorySheet, SheetBackend,
};

use crate::config::{BackendKind, ServerConfig};

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.auth.password_hash.is_empty() && config.auth.password.is_empty() {
        anyhow::bail!(
            "No password found in configuration.\n\
             Set [auth] password_hash (argon2id) or password."
        );
    }
    if config.session.secret.is_empty() {
        anyhow::bail!("Session secret is empty in configuration.");
    }
    if config.campaigns.is_empty() {
        anyhow::bail!("No campaigns configured. Add at least one [[campaigns]] entry.");
    }
    Ok(())
}

/// The password gate for `/auth/login`. A hash wins over a plaintext password.
pub fn auth_provider(config: &ServerConfig) -> Arc<dyn AuthProvider> {
    if !config.auth.password_hash.is_empty() {
        Arc::new(Argon2Password::new(config.auth.password_hash.clone()))
    } else {
        Arc::new(SharedPassword::new(config.auth.password.clone()))
    }
}

/// Construct the sheet backend named in `[backend]`.
pub fn sheet_backend(config: &ServerConfig) -> Arc<dyn SheetBackend> {
    match config.backend.kind {
        BackendKind::Google => {
            info!(
                "Using Google Sheets backend (credentials: {})",
                config.backend.credentials.display()
            );
            Arc::new(GoogleSheetsBackend::new(GoogleSheetsConfig {
                credentials_path: config.backend.credentials.clone(),
                timeout: config.backend.timeout(),
                ..Default::default()
            }))
        }
        BackendKind::Memory => {
            let backend = MemoryBackend::new();
            for sheet in &config.memory_sheets {
                backend.insert(
                    sheet.source.clone(),
                    MemorySheet::with_rows(sheet.header.as_slice(), sheet.rows.as_slice()),
                );
            }
            info!("Using in-memory backend with {} sheets", backend.len());
            Arc::new(backend)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extra: &str) -> ServerConfig {
        let base = format!(
            "{}\n[session]\nsecret = \"s\"\n[backend]\nkind = \"memory\"\n\
             [[campaigns]]\nname = \"Texas\"\nsource = \"sheet-1\"\n\
             [[memory_sheets]]\nsource = \"sheet-1\"\nheader = [\"First Name\"]\nrows = [[\"Alex\"]]\n",
            extra
        );
        toml::from_str(&base).unwrap()
    }

    #[test]
    fn test_verify_config_requires_password() {
        assert!(verify_config(&config("")).is_err());
        assert!(verify_config(&config("[auth]\npassword = \"p\"")).is_ok());
    }

    #[test]
    fn test_verify_config_requires_secret_and_campaigns() {
        let mut c = config("[auth]\npassword = \"p\"");
        c.session.secret.clear();
        assert!(verify_config(&c).is_err());

        let mut c = config("[auth]\npassword = \"p\"");
        c.campaigns.clear();
        let err = verify_config(&c).unwrap_err();
        assert!(err.to_string().contains("No campaigns"));
    }

    #[test]
    fn test_plain_password_provider() {
        let provider = auth_provider(&config("[auth]\npassword = \"sales2024\""));
        assert!(provider.authenticate("sales2024").is_authenticated());
        assert!(!provider.authenticate("wrong").is_authenticated());
    }

    #[test]
    fn test_hash_wins_over_plain_password() {
        let provider = auth_provider(&config(
            "[auth]\npassword = \"sales2024\"\npassword_hash = \"not-a-hash\"",
        ));
        assert!(!provider.authenticate("sales2024").is_authenticated());
    }

    #[test]
    fn test_memory_backend_is_seeded() {
        let backend = sheet_backend(&config("[auth]\npassword = \"p\""));
        assert_eq!(backend.kind(), "memory");
        let source = backend.open("sheet-1").unwrap();
        assert_eq!(source.header_row().unwrap(), vec!["First Name".to_string()]);
    }
}
