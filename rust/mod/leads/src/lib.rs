pub mod adapter;
pub mod api;
pub mod campaign;
pub mod error;
pub mod logger;
pub mod mock;
pub mod model;
pub mod selector;
pub mod service;

use std::sync::Arc;

use axum::Router;
use leadbox_core::Module;
use leadbox_sheet::SheetBackend;

pub use campaign::{Campaign, CampaignRegistry};
pub use error::LeadError;
pub use model::{CallOutcome, DataMode, DuplicateKeyPolicy, LeadRecord, LeadTable};
pub use service::{LeadConfig, LeadService};

/// The leads module: campaign loading, lead selection and call logging.
///
/// Mount its routes under `/leads`. The log route expects a
/// [`leadbox_core::Session`] in the request extensions.
pub struct LeadsModule {
    service: Arc<LeadService>,
}

impl LeadsModule {
    pub fn new(backend: Arc<dyn SheetBackend>, config: LeadConfig) -> Self {
        Self {
            service: Arc::new(LeadService::new(backend, config)),
        }
    }

    pub fn service(&self) -> &Arc<LeadService> {
        &self.service
    }
}

impl Module for LeadsModule {
    fn name(&self) -> &str {
        "leads"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
