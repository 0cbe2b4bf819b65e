//! Route registration: collects module routes and system endpoints.

use std::sync::Arc;

use axum::middleware;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use leadbox_core::AuthProvider;

use crate::login;
use crate::session::{self, SessionKeys};

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionKeys>,
    pub auth: Arc<dyn AuthProvider>,
}

/// Build the complete router with all routes.
pub fn build_router(state: AppState, module_routes: Vec<(&str, Router)>) -> Router {
    let sessions = state.sessions.clone();

    // System endpoints (public, no state needed).
    let system_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    let mut app: Router<()> = Router::new()
        .route("/", get(index_page))
        .merge(login::routes())
        .with_state(state)
        .merge(system_routes);

    // Mount each module's routes under /{module_name}.
    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }

    app.layer(middleware::from_fn_with_state(
        sessions,
        session::session_guard,
    ))
}

async fn index_page() -> impl IntoResponse {
    Html(include_str!("web/index.html"))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "leadboxd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
