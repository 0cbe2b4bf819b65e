use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use leadbox_core::error_response;

/// Stable codes for lead workflow failures.
pub mod error_code {
    pub const CAMPAIGN_NOT_FOUND: &str = "CAMPAIGN_NOT_FOUND";
    pub const SOURCE_UNCONFIGURED: &str = "SOURCE_UNCONFIGURED";
    pub const CREDENTIALS_MISSING: &str = "CREDENTIALS_MISSING";
    pub const CONNECTION_FAILED: &str = "CONNECTION_FAILED";
    pub const LEAD_NOT_FOUND: &str = "LEAD_NOT_FOUND";
    pub const NO_IDENTIFYING_KEY: &str = "NO_IDENTIFYING_KEY";
    pub const ROW_NOT_FOUND: &str = "ROW_NOT_FOUND";
    pub const AMBIGUOUS_MATCH: &str = "AMBIGUOUS_MATCH";
    pub const SCHEMA_MISMATCH: &str = "SCHEMA_MISMATCH";
    pub const UPDATE_FAILED: &str = "UPDATE_FAILED";
}

/// Failures of the load / select / log workflow.
///
/// Every variant is shown to the rep as an inline message; none is fatal to
/// the server.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("campaign '{0}' is not configured")]
    CampaignNotFound(String),

    #[error("Select a valid campaign to load data. The campaign has no sheet URL yet.")]
    SourceUnconfigured,

    /// Returned by `LeadAdapter::load`. `load_or_demo` answers it with demo data.
    #[error("Setup Required: credentials not found ({0})")]
    CredentialsMissing(String),

    #[error("Error connecting to the sheet: {0}")]
    ConnectionFailed(String),

    #[error("lead '{0}' is not in this campaign")]
    LeadNotFound(String),

    #[error("Cannot save: Both Direct and Mobile phone numbers are missing for this lead. Cannot identify row.")]
    NoIdentifyingKey,

    #[error("Could not find row with phone number: {key}")]
    RowNotFound { key: String },

    #[error("Phone number {key} appears in several rows ({rows:?}); refusing to guess")]
    AmbiguousMatch { key: String, rows: Vec<usize> },

    #[error("Column missing in Sheet: '{header}'. Check headers.")]
    SchemaMismatch { header: String },

    #[error("Update failed: {0}")]
    UpdateFailed(String),
}

impl LeadError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CampaignNotFound(_) => error_code::CAMPAIGN_NOT_FOUND,
            Self::SourceUnconfigured => error_code::SOURCE_UNCONFIGURED,
            Self::CredentialsMissing(_) => error_code::CREDENTIALS_MISSING,
            Self::ConnectionFailed(_) => error_code::CONNECTION_FAILED,
            Self::LeadNotFound(_) => error_code::LEAD_NOT_FOUND,
            Self::NoIdentifyingKey => error_code::NO_IDENTIFYING_KEY,
            Self::RowNotFound { .. } => error_code::ROW_NOT_FOUND,
            Self::AmbiguousMatch { .. } => error_code::AMBIGUOUS_MATCH,
            Self::SchemaMismatch { .. } => error_code::SCHEMA_MISMATCH,
            Self::UpdateFailed(_) => error_code::UPDATE_FAILED,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CampaignNotFound(_) | Self::LeadNotFound(_) | Self::RowNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::SourceUnconfigured | Self::NoIdentifyingKey | Self::SchemaMismatch { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::CredentialsMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ConnectionFailed(_) | Self::UpdateFailed(_) => StatusCode::BAD_GATEWAY,
            Self::AmbiguousMatch { .. } => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for LeadError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.error_code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(LeadError::CampaignNotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(LeadError::SourceUnconfigured.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            LeadError::CredentialsMissing("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(LeadError::ConnectionFailed("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(LeadError::NoIdentifyingKey.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            LeadError::AmbiguousMatch { key: "1".into(), rows: vec![2, 3] }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(LeadError::UpdateFailed("x".into()).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn error_code_mapping() {
        assert_eq!(LeadError::LeadNotFound("x".into()).error_code(), "LEAD_NOT_FOUND");
        assert_eq!(LeadError::RowNotFound { key: "1".into() }.error_code(), "ROW_NOT_FOUND");
        assert_eq!(
            LeadError::SchemaMismatch { header: "Notes".into() }.error_code(),
            "SCHEMA_MISMATCH"
        );
    }

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            LeadError::RowNotFound { key: "555-0101".into() }.to_string(),
            "Could not find row with phone number: 555-0101"
        );
        assert!(LeadError::SchemaMismatch { header: "Notes".into() }
            .to_string()
            .contains("'Notes'"));
    }
}
