//! Pluggable password gate.
//!
//! The server only knows the [`AuthProvider`] trait. Which provider is used
//! (plaintext shared password or argon2id hash) is decided from config at
//! startup and injected into the login route.

use argon2::Argon2;
use password_hash::{PasswordHash, PasswordVerifier};

/// Outcome of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Authenticated,
    Denied,
}

impl AuthDecision {
    pub fn is_authenticated(self) -> bool {
        self == AuthDecision::Authenticated
    }
}

/// Checks a submitted password.
pub trait AuthProvider: Send + Sync + 'static {
    fn authenticate(&self, password: &str) -> AuthDecision;
}

/// A single shared password, compared as plain text.
pub struct SharedPassword {
    password: String,
}

impl SharedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl AuthProvider for SharedPassword {
    fn authenticate(&self, password: &str) -> AuthDecision {
        if !self.password.is_empty() && password == self.password {
            AuthDecision::Authenticated
        } else {
            AuthDecision::Denied
        }
    }
}

/// A shared password stored as an argon2id PHC string.
pub struct Argon2Password {
    hash: String,
}

impl Argon2Password {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

impl AuthProvider for Argon2Password {
    fn authenticate(&self, password: &str) -> AuthDecision {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) if Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok() =>
            {
                AuthDecision::Authenticated
            }
            _ => AuthDecision::Denied,
        }
    }
}

/// Rejects every password. Used for testing.
pub struct DenyAll;

impl AuthProvider for DenyAll {
    fn authenticate(&self, _password: &str) -> AuthDecision {
        AuthDecision::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    #[test]
    fn shared_password_exact_match() {
        let auth = SharedPassword::new("MVP");
        assert_eq!(auth.authenticate("MVP"), AuthDecision::Authenticated);
        assert_eq!(auth.authenticate("mvp"), AuthDecision::Denied);
        assert_eq!(auth.authenticate(""), AuthDecision::Denied);
    }

    #[test]
    fn empty_shared_password_denies_everything() {
        let auth = SharedPassword::new("");
        assert_eq!(auth.authenticate(""), AuthDecision::Denied);
    }

    #[test]
    fn argon2_password_verifies_hash() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"s3cret", &salt)
            .unwrap()
            .to_string();
        let auth = Argon2Password::new(hash);
        assert!(auth.authenticate("s3cret").is_authenticated());
        assert!(!auth.authenticate("wrong").is_authenticated());
    }

    #[test]
    fn argon2_invalid_hash_denies() {
        let auth = Argon2Password::new("not-a-hash");
        assert_eq!(auth.authenticate("anything"), AuthDecision::Denied);
    }

    #[test]
    fn deny_all() {
        assert_eq!(DenyAll.authenticate("MVP"), AuthDecision::Denied);
    }
}
