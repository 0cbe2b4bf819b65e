use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::warn;

use leadbox_core::{now_local_minute, ListResult, ServiceError, Session};

use crate::error::LeadError;
use crate::service::{
    CampaignSummary, CampaignView, CardView, LeadService, LogRequest, LogResult,
};

type ServiceState = Arc<LeadService>;

pub fn routes(service: Arc<LeadService>) -> Router {
    Router::new()
        .route("/campaigns", get(list_campaigns))
        .route("/campaigns/{name}/leads", get(load_campaign))
        .route("/campaigns/{name}/leads/card", get(lead_card))
        .route("/campaigns/{name}/log", post(log_interaction))
        .with_state(service)
}

/// Run a blocking service call off the async runtime.
async fn blocking<T, F>(service: ServiceState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&LeadService) -> Result<T, LeadError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(&service)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!("{}: {}", e.error_code(), e);
            Err(e.into_response())
        }
        Err(e) => Err(ServiceError::Internal(format!("worker failed: {}", e)).into_response()),
    }
}

// ---------------------------------------------------------------------------
// GET /campaigns
// ---------------------------------------------------------------------------

async fn list_campaigns(State(service): State<ServiceState>) -> Json<ListResult<CampaignSummary>> {
    Json(ListResult::new(service.campaigns()))
}

// ---------------------------------------------------------------------------
// GET /campaigns/{name}/leads
// ---------------------------------------------------------------------------

async fn load_campaign(
    State(service): State<ServiceState>,
    Path(name): Path<String>,
) -> Result<Json<CampaignView>, Response> {
    let view = blocking(service, move |svc| svc.load_campaign(&name)).await?;
    Ok(Json(view))
}

// ---------------------------------------------------------------------------
// GET /campaigns/{name}/leads/card?label=
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CardQuery {
    label: String,
}

async fn lead_card(
    State(service): State<ServiceState>,
    Path(name): Path<String>,
    query: Result<Query<CardQuery>, QueryRejection>,
) -> Result<Json<CardView>, Response> {
    let Query(query) = query.map_err(|e| ServiceError::from(e).into_response())?;
    let card = blocking(service, move |svc| svc.lead_card(&name, &query.label)).await?;
    Ok(Json(card))
}

// ---------------------------------------------------------------------------
// POST /campaigns/{name}/log
// ---------------------------------------------------------------------------

async fn log_interaction(
    State(service): State<ServiceState>,
    Extension(session): Extension<Session>,
    Path(name): Path<String>,
    body: Result<Json<LogRequest>, JsonRejection>,
) -> Result<Json<LogResult>, Response> {
    let Json(req) = body.map_err(|e| ServiceError::from(e).into_response())?;
    let timestamp = now_local_minute();
    let result = blocking(service, move |svc| {
        svc.log_interaction(&name, req, &session.rep, timestamp)
    })
    .await?;
    Ok(Json(result))
}
