//! Login endpoint: checks the shared password, issues a session token.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use leadbox_core::ServiceError;

use crate::routes::AppState;

const WRONG_PASSWORD: &str = "Incorrect Password. Please try again.";

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
    /// Rep name recorded as the default `Sales Rep` for this session.
    #[serde(default)]
    pub rep: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Register login routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login_handler))
}

/// Handle POST /auth/login.
async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let Json(body) = body?;
    if !state.auth.authenticate(&body.password).is_authenticated() {
        return Err(ServiceError::Unauthorized(WRONG_PASSWORD.to_string()));
    }

    let token = state.sessions.issue(body.rep.trim()).map_err(|e| {
        tracing::error!("Failed to encode session token: {}", e);
        ServiceError::Internal("internal server error".into())
    })?;

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.sessions.expire_secs(),
    }))
}
