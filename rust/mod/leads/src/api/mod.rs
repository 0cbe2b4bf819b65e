mod campaigns;

use std::sync::Arc;

use axum::Router;

use crate::service::LeadService;

/// Build the leads module router.
///
/// Routes:
/// - `GET  /campaigns`                      list campaigns
/// - `GET  /campaigns/{name}/leads`         load a campaign
/// - `GET  /campaigns/{name}/leads/card`    detail card for `?label=`
/// - `POST /campaigns/{name}/log`           log a call outcome
///
/// The log route reads the caller's [`leadbox_core::Session`] from the
/// request extensions.
pub fn router(service: Arc<LeadService>) -> Router {
    campaigns::routes(service)
}
