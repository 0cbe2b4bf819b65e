use std::collections::BTreeSet;

use tracing::{debug, info};

use leadbox_sheet::{CellRef, CellUpdate};

use crate::adapter::SheetHandle;
use crate::error::LeadError;
use crate::model::{
    DuplicateKeyPolicy, InteractionUpdate, LeadRecord, SaveStatus, LOG_COLUMNS, UNKNOWN,
};

/// InteractionLogger writes a call outcome back to the lead's sheet row.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionLogger {
    duplicate_keys: DuplicateKeyPolicy,
}

impl InteractionLogger {
    pub fn new(duplicate_keys: DuplicateKeyPolicy) -> Self {
        Self { duplicate_keys }
    }

    /// Save `update` to the row of `record` in the live sheet.
    ///
    /// The row is found by phone number (direct, then mobile). All four
    /// target columns are resolved before anything is written, and the cells
    /// go out as one batch in the order Outcome, Notes, Sales Rep, Date Called.
    /// The caller's copy of the record is not modified.
    pub fn save(
        &self,
        capability: Option<&SheetHandle>,
        record: &LeadRecord,
        update: &InteractionUpdate,
    ) -> Result<SaveStatus, LeadError> {
        let Some(handle) = capability else {
            return Ok(SaveStatus::NotPersisted);
        };
        let source = handle.source();

        let key = identifying_key(record).ok_or(LeadError::NoIdentifyingKey)?;

        let matches = source
            .find_cells(key)
            .map_err(|e| LeadError::UpdateFailed(e.to_string()))?;
        let row = self.pick_row(key, &matches)?;

        let header = source
            .header_row()
            .map_err(|e| LeadError::UpdateFailed(e.to_string()))?;
        let cols = resolve_columns(&header)?;

        let updates: Vec<CellUpdate> = cols
            .iter()
            .zip(update.values())
            .map(|(&col, value)| CellUpdate {
                cell: CellRef::new(row, col),
                value: value.to_string(),
            })
            .collect();
        debug!("writing {} cells to row {} of {}", updates.len(), row, handle.source_id());
        source
            .update_cells(&updates)
            .map_err(|e| LeadError::UpdateFailed(e.to_string()))?;

        info!(
            "logged '{}' for row {} of {}",
            update.outcome,
            row,
            handle.source_id()
        );
        Ok(SaveStatus::Persisted { row })
    }

    fn pick_row(&self, key: &str, matches: &[CellRef]) -> Result<usize, LeadError> {
        let first = matches.first().ok_or_else(|| LeadError::RowNotFound {
            key: key.to_string(),
        })?;
        if self.duplicate_keys == DuplicateKeyPolicy::Reject {
            let rows: BTreeSet<usize> = matches.iter().map(|c| c.row).collect();
            if rows.len() > 1 {
                return Err(LeadError::AmbiguousMatch {
                    key: key.to_string(),
                    rows: rows.into_iter().collect(),
                });
            }
        }
        Ok(first.row)
    }
}

/// Direct phone, falling back to mobile. Empty and `Unknown` don't count.
pub fn identifying_key(record: &LeadRecord) -> Option<&str> {
    [record.direct_phone(), record.mobile_phone()]
        .into_iter()
        .find(|key| !key.is_empty() && *key != UNKNOWN)
}

/// 1-based positions of [`LOG_COLUMNS`] in the header row.
fn resolve_columns(header: &[String]) -> Result<[usize; 4], LeadError> {
    let mut cols = [0usize; 4];
    for (slot, name) in cols.iter_mut().zip(LOG_COLUMNS) {
        let idx = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LeadError::SchemaMismatch {
                header: name.to_string(),
            })?;
        *slot = idx + 1;
    }
    Ok(cols)
}
