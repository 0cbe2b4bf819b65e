//! Session guard middleware.
//!
//! Extracts the session token from `Authorization: Bearer <token>`,
//! validates it, and provides [`Session`] to downstream handlers.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use leadbox_core::{ServiceError, Session};

/// Signing and verification keys for session tokens (HS256).
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expire_secs: u64,
}

impl SessionKeys {
    pub fn new(secret: &str, expire_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            expire_secs,
        }
    }

    pub fn expire_secs(&self) -> u64 {
        self.expire_secs
    }

    /// Start a session for `rep` and sign it.
    pub fn issue(&self, rep: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let session = Session::new(rep, self.expire_secs);
        jsonwebtoken::encode(&Header::default(), &session, &self.encoding_key)
    }

    pub fn verify(&self, token: &str) -> Result<Session, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Session>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
    }
}

/// Middleware that requires a valid session on every non-public path and
/// stores it in the request extensions.
pub async fn session_guard(
    State(keys): State<std::sync::Arc<SessionKeys>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("missing session token".into()))?;

    let session = keys
        .verify(token)
        .map_err(|e| ServiceError::Unauthorized(format!("invalid session token: {}", e)))?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Check if a request path is public (no session required).
fn is_public_path(path: &str) -> bool {
    matches!(path, "/" | "/health" | "/version" | "/auth/login")
}
