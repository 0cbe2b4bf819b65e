use serde::{Deserialize, Serialize};

/// An authenticated rep's session.
///
/// Issued by the login endpoint as signed token claims and placed into the
/// request extensions by the session guard. Handlers that need it take
/// `Extension<Session>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session id.
    pub sid: String,
    /// Rep name given at login; may be empty.
    #[serde(default)]
    pub rep: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Session {
    pub fn new(rep: impl Into<String>, ttl_secs: u64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sid: crate::new_id(),
            rep: rep.into(),
            iat: now,
            exp: now + ttl_secs as i64,
        }
    }
}
