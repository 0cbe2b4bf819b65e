use std::sync::Arc;

use serde::{Deserialize, Serialize};

use leadbox_sheet::SheetBackend;

use crate::adapter::LeadAdapter;
use crate::campaign::{Campaign, CampaignRegistry};
use crate::error::LeadError;
use crate::logger::InteractionLogger;
use crate::model::{
    CallOutcome, DataMode, DuplicateKeyPolicy, InteractionUpdate, LeadTable, SaveStatus,
};
use crate::selector::{self, LeadCard, LeadOption};

const DEMO_NOTICE: &str =
    "Setup Required: sheet credentials not found. Displaying Mock Data. Add your key to connect real data.";
const DEMO_SAVE_MESSAGE: &str = "Updates are not saved in Demo Mode.";

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    pub name: String,
    pub configured: bool,
}

/// Everything the table view and lead dropdown need.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignView {
    pub campaign: String,
    pub mode: DataMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<crate::model::LeadRecord>,
    pub options: Vec<LeadOption>,
}

impl CampaignView {
    fn new(campaign: &Campaign, mode: DataMode, table: LeadTable) -> Self {
        let options = selector::lead_options(&table);
        Self {
            campaign: campaign.name.clone(),
            mode,
            notice: (mode == DataMode::Demo).then(|| DEMO_NOTICE.to_string()),
            columns: table.columns,
            rows: table.rows,
            options,
        }
    }
}

/// Detail panel plus log-form defaults for one lead.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub row: usize,
    pub card: LeadCard,
    pub outcomes: Vec<CallOutcome>,
    pub default_outcome: CallOutcome,
}

/// Body of a log submission.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRequest {
    /// Dropdown label of the lead.
    pub label: String,
    pub outcome: CallOutcome,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sales_rep: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogResult {
    Persisted { row: usize, message: String },
    NotPersisted { message: String },
}

// ---------------------------------------------------------------------------
// LeadService
// ---------------------------------------------------------------------------

/// Configuration for the lead workflow.
#[derive(Debug, Clone, Default)]
pub struct LeadConfig {
    pub campaigns: Vec<Campaign>,
    pub duplicate_keys: DuplicateKeyPolicy,
}

/// LeadService runs the load / select / log workflow for one request at a
/// time. All methods block on the sheet backend.
pub struct LeadService {
    registry: CampaignRegistry,
    adapter: LeadAdapter,
    logger: InteractionLogger,
}

impl LeadService {
    pub fn new(backend: Arc<dyn SheetBackend>, config: LeadConfig) -> Self {
        Self {
            registry: CampaignRegistry::new(config.campaigns),
            adapter: LeadAdapter::new(backend),
            logger: InteractionLogger::new(config.duplicate_keys),
        }
    }

    pub fn registry(&self) -> &CampaignRegistry {
        &self.registry
    }

    pub fn backend_kind(&self) -> &'static str {
        self.adapter.backend_kind()
    }

    pub fn campaigns(&self) -> Vec<CampaignSummary> {
        self.registry
            .iter()
            .map(|c| CampaignSummary {
                name: c.name.clone(),
                configured: c.is_configured(),
            })
            .collect()
    }

    pub fn load_campaign(&self, name: &str) -> Result<CampaignView, LeadError> {
        let campaign = self.registry.get(name)?;
        let loaded = self.adapter.load_or_demo(&campaign.source)?;
        Ok(CampaignView::new(campaign, loaded.mode, loaded.table))
    }

    pub fn lead_card(&self, name: &str, label: &str) -> Result<CardView, LeadError> {
        let campaign = self.registry.get(name)?;
        let loaded = self.adapter.load_or_demo(&campaign.source)?;
        let row = selector::resolve(&loaded.table, label)?;
        let record = loaded
            .table
            .get(row)
            .ok_or_else(|| LeadError::LeadNotFound(label.to_string()))?;
        let card = LeadCard::from_record(record);
        let default_outcome = card.default_outcome();
        Ok(CardView {
            row,
            card,
            outcomes: CallOutcome::ALL.to_vec(),
            default_outcome,
        })
    }

    /// Reload the campaign, resolve the chosen lead and write the outcome.
    ///
    /// `sales_rep` falls back to `session_rep` when the form left it blank.
    pub fn log_interaction(
        &self,
        name: &str,
        request: LogRequest,
        session_rep: &str,
        timestamp: String,
    ) -> Result<LogResult, LeadError> {
        let campaign = self.registry.get(name)?;
        let loaded = self.adapter.load_or_demo(&campaign.source)?;
        let row = selector::resolve(&loaded.table, &request.label)?;
        let record = loaded
            .table
            .get(row)
            .ok_or_else(|| LeadError::LeadNotFound(request.label.clone()))?;

        let sales_rep = if request.sales_rep.trim().is_empty() {
            session_rep.to_string()
        } else {
            request.sales_rep
        };
        let update = InteractionUpdate {
            outcome: request.outcome,
            notes: request.notes,
            sales_rep,
            timestamp,
        };

        match self.logger.save(loaded.capability.as_ref(), record, &update)? {
            SaveStatus::Persisted { row } => Ok(LogResult::Persisted {
                row,
                message: format!("Updated {} in {}!", record.first_name(), campaign.name),
            }),
            SaveStatus::NotPersisted => Ok(LogResult::NotPersisted {
                message: DEMO_SAVE_MESSAGE.to_string(),
            }),
        }
    }
}
