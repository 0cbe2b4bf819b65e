use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Sheet header names the workflow depends on.
pub mod columns {
    pub const FIRST_NAME: &str = "First Name";
    pub const LAST_NAME: &str = "Last Name";
    pub const COMPANY: &str = "Company";
    pub const WEBSITE: &str = "Website";
    pub const EMAIL: &str = "Email";
    pub const DIRECT_PHONE: &str = "Direct Phone Number";
    pub const MOBILE_PHONE: &str = "Mobile Phone Number";
    pub const CALL_OUTCOME: &str = "Call Outcome";
    pub const NOTES: &str = "Notes";
    pub const SALES_REP: &str = "Sales Rep";
    pub const DATE_CALLED: &str = "Date Called";
}

/// Sentinel for identity fields whose column is missing from the sheet.
pub const UNKNOWN: &str = "Unknown";

/// Default assigned to a required column that the sheet does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    Empty,
    Unknown,
}

impl ColumnDefault {
    pub fn value(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Unknown => UNKNOWN,
        }
    }
}

/// Every column a loaded record is guaranteed to have, in the order they are
/// appended when missing.
pub const REQUIRED_COLUMNS: [(&str, ColumnDefault); 11] = [
    (columns::FIRST_NAME, ColumnDefault::Unknown),
    (columns::LAST_NAME, ColumnDefault::Unknown),
    (columns::COMPANY, ColumnDefault::Unknown),
    (columns::WEBSITE, ColumnDefault::Empty),
    (columns::EMAIL, ColumnDefault::Unknown),
    (columns::DIRECT_PHONE, ColumnDefault::Unknown),
    (columns::MOBILE_PHONE, ColumnDefault::Empty),
    (columns::CALL_OUTCOME, ColumnDefault::Empty),
    (columns::NOTES, ColumnDefault::Empty),
    (columns::SALES_REP, ColumnDefault::Empty),
    (columns::DATE_CALLED, ColumnDefault::Empty),
];

/// Columns the logger writes, in write order.
pub const LOG_COLUMNS: [&str; 4] = [
    columns::CALL_OUTCOME,
    columns::NOTES,
    columns::SALES_REP,
    columns::DATE_CALLED,
];

// ---------------------------------------------------------------------------
// LeadRecord / LeadTable
// ---------------------------------------------------------------------------

/// One sheet row: column name → cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadRecord(BTreeMap<String, String>);

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell value, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn first_name(&self) -> &str {
        self.get(columns::FIRST_NAME)
    }

    pub fn last_name(&self) -> &str {
        self.get(columns::LAST_NAME)
    }

    pub fn company(&self) -> &str {
        self.get(columns::COMPANY)
    }

    pub fn website(&self) -> &str {
        self.get(columns::WEBSITE)
    }

    pub fn email(&self) -> &str {
        self.get(columns::EMAIL)
    }

    pub fn direct_phone(&self) -> &str {
        self.get(columns::DIRECT_PHONE)
    }

    pub fn mobile_phone(&self) -> &str {
        self.get(columns::MOBILE_PHONE)
    }

    pub fn call_outcome(&self) -> &str {
        self.get(columns::CALL_OUTCOME)
    }

    pub fn notes(&self) -> &str {
        self.get(columns::NOTES)
    }

    pub fn sales_rep(&self) -> &str {
        self.get(columns::SALES_REP)
    }

    pub fn date_called(&self) -> &str {
        self.get(columns::DATE_CALLED)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LeadRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Rows of one campaign sheet, in source order.
///
/// `columns` keeps the sheet's header order followed by any required
/// columns the sheet was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadTable {
    pub columns: Vec<String>,
    pub rows: Vec<LeadRecord>,
}

impl LeadTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&LeadRecord> {
        self.rows.get(row)
    }
}

// ---------------------------------------------------------------------------
// CallOutcome
// ---------------------------------------------------------------------------

/// Result of a call, as offered in the log form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    #[serde(rename = "Not Called")]
    NotCalled,
    #[serde(rename = "No Answer")]
    NoAnswer,
    #[serde(rename = "Left Voicemail")]
    LeftVoicemail,
    #[serde(rename = "Not Interested")]
    NotInterested,
    #[serde(rename = "Interested")]
    Interested,
    #[serde(rename = "Meeting Booked")]
    MeetingBooked,
}

impl CallOutcome {
    /// Every outcome, in form order.
    pub const ALL: [CallOutcome; 6] = [
        Self::NotCalled,
        Self::NoAnswer,
        Self::LeftVoicemail,
        Self::NotInterested,
        Self::Interested,
        Self::MeetingBooked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotCalled => "Not Called",
            Self::NoAnswer => "No Answer",
            Self::LeftVoicemail => "Left Voicemail",
            Self::NotInterested => "Not Interested",
            Self::Interested => "Interested",
            Self::MeetingBooked => "Meeting Booked",
        }
    }

    /// Preselected outcome for a record: its current outcome if that is a
    /// known value, otherwise `Not Called`.
    pub fn form_default(current: &str) -> Self {
        current.parse().unwrap_or(Self::NotCalled)
    }
}

/// A cell value that is not one of the [`CallOutcome`] labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown call outcome '{0}'")]
pub struct UnknownOutcome(pub String);

impl std::str::FromStr for CallOutcome {
    type Err = UnknownOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownOutcome(s.to_string()))
    }
}

impl std::fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Log workflow
// ---------------------------------------------------------------------------

/// Values written back to a lead's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionUpdate {
    pub outcome: CallOutcome,
    pub notes: String,
    pub sales_rep: String,
    /// `YYYY-MM-DD HH:MM`, local clock.
    pub timestamp: String,
}

impl InteractionUpdate {
    /// Cell values in [`LOG_COLUMNS`] order.
    pub fn values(&self) -> [&str; 4] {
        [
            self.outcome.as_str(),
            &self.notes,
            &self.sales_rep,
            &self.timestamp,
        ]
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    /// Read from the campaign's sheet; writes are enabled.
    Live,
    /// Built-in sample data; writes are disabled.
    Demo,
}

/// Outcome of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Cells were written to this 1-based sheet row.
    Persisted { row: usize },
    /// No writable sheet; nothing was written.
    NotPersisted,
}

/// How the logger treats a phone key that matches more than one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Use the first matching cell in row-major order.
    #[default]
    FirstMatch,
    /// Refuse to write and report every matching row.
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_round_trips_through_labels() {
        for outcome in CallOutcome::ALL {
            assert_eq!(outcome.as_str().parse::<CallOutcome>(), Ok(outcome));
        }
        assert_eq!(
            "interested".parse::<CallOutcome>(),
            Err(UnknownOutcome("interested".into()))
        );
    }

    #[test]
    fn outcome_serde_uses_display_labels() {
        let json = serde_json::to_string(&CallOutcome::MeetingBooked).unwrap();
        assert_eq!(json, "\"Meeting Booked\"");
        let back: CallOutcome = serde_json::from_str("\"Left Voicemail\"").unwrap();
        assert_eq!(back, CallOutcome::LeftVoicemail);
    }

    #[test]
    fn form_default_falls_back_to_not_called() {
        assert_eq!(CallOutcome::form_default("Interested"), CallOutcome::Interested);
        assert_eq!(CallOutcome::form_default(""), CallOutcome::NotCalled);
        assert_eq!(CallOutcome::form_default("Callback"), CallOutcome::NotCalled);
    }

    #[test]
    fn record_get_missing_is_empty() {
        let record: LeadRecord = [("First Name", "Alex")].into_iter().collect();
        assert_eq!(record.first_name(), "Alex");
        assert_eq!(record.company(), "");
        assert!(!record.contains(columns::COMPANY));
    }

    #[test]
    fn update_values_follow_log_column_order() {
        let update = InteractionUpdate {
            outcome: CallOutcome::Interested,
            notes: "x".into(),
            sales_rep: "A".into(),
            timestamp: "2026-10-18 09:30".into(),
        };
        assert_eq!(update.values(), ["Interested", "x", "A", "2026-10-18 09:30"]);
    }

    #[test]
    fn duplicate_policy_parses_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: DuplicateKeyPolicy,
        }
        let w: Wrapper = serde_json::from_str(r#"{"policy":"reject"}"#).unwrap();
        assert_eq!(w.policy, DuplicateKeyPolicy::Reject);
        assert_eq!(DuplicateKeyPolicy::default(), DuplicateKeyPolicy::FirstMatch);
    }
}
