use std::sync::Arc;

use tracing::{debug, warn};

use leadbox_sheet::{is_placeholder, SheetBackend, SheetError, SheetRows, TableSource};

use crate::error::LeadError;
use crate::mock;
use crate::model::{DataMode, LeadRecord, LeadTable, REQUIRED_COLUMNS};

/// Write capability for one campaign sheet, handed out by a live load.
#[derive(Clone)]
pub struct SheetHandle {
    source_id: String,
    source: Arc<dyn TableSource>,
}

impl SheetHandle {
    pub fn new(source_id: impl Into<String>, source: Arc<dyn TableSource>) -> Self {
        Self {
            source_id: source_id.into(),
            source,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn source(&self) -> &dyn TableSource {
        self.source.as_ref()
    }
}

impl std::fmt::Debug for SheetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetHandle")
            .field("source_id", &self.source_id)
            .finish_non_exhaustive()
    }
}

/// A freshly loaded campaign.
#[derive(Debug)]
pub struct LoadedCampaign {
    pub table: LeadTable,
    /// `None` in demo mode: saves are not persisted.
    pub capability: Option<SheetHandle>,
    pub mode: DataMode,
}

/// LeadAdapter loads campaign sheets through the injected backend.
pub struct LeadAdapter {
    backend: Arc<dyn SheetBackend>,
}

impl LeadAdapter {
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Load every row of the sheet behind `source_id`.
    ///
    /// Nothing is cached: each call reads the sheet again. Only a placeholder
    /// source is unconfigured; any other backend failure, including a source
    /// the backend cannot parse, is a connection failure.
    pub fn load(&self, source_id: &str) -> Result<LoadedCampaign, LeadError> {
        if is_placeholder(source_id) {
            return Err(LeadError::SourceUnconfigured);
        }

        let fetched = self
            .backend
            .open(source_id)
            .and_then(|source| source.read_records().map(|rows| (source, rows)));

        match fetched {
            Ok((source, rows)) => {
                debug!("loaded {} rows from {}", rows.rows.len(), source_id);
                Ok(LoadedCampaign {
                    table: normalize(rows),
                    capability: Some(SheetHandle::new(source_id, source)),
                    mode: DataMode::Live,
                })
            }
            Err(SheetError::CredentialsMissing(path)) => Err(LeadError::CredentialsMissing(path)),
            Err(e) => Err(LeadError::ConnectionFailed(e.to_string())),
        }
    }

    /// [`load`](Self::load), serving the demo dataset (and no write
    /// capability) when the backend has no credentials.
    pub fn load_or_demo(&self, source_id: &str) -> Result<LoadedCampaign, LeadError> {
        match self.load(source_id) {
            Err(LeadError::CredentialsMissing(path)) => {
                warn!(
                    "sheet credentials not found at {}; serving demo data, saves disabled",
                    path
                );
                Ok(LoadedCampaign {
                    table: normalize(mock::demo_rows()),
                    capability: None,
                    mode: DataMode::Demo,
                })
            }
            other => other,
        }
    }
}

/// Turn raw sheet rows into records that carry every required column.
///
/// Only missing *columns* are defaulted; blank cells in existing columns
/// stay blank.
pub fn normalize(rows: SheetRows) -> LeadTable {
    let mut columns = rows.header.clone();
    let missing: Vec<_> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|(name, _)| !rows.header.iter().any(|h| h.as_str() == *name))
        .collect();
    columns.extend(missing.iter().map(|(name, _)| name.to_string()));

    let records = rows
        .rows
        .into_iter()
        .map(|cells| {
            let mut record: LeadRecord = rows
                .header
                .iter()
                .zip(cells)
                .filter(|(h, _)| !h.is_empty())
                .collect();
            for (name, default) in &missing {
                record.set(*name, default.value());
            }
            record
        })
        .collect();

    LeadTable {
        columns,
        rows: records,
    }
}
