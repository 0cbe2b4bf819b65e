use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    /// The source id is blank, a placeholder, or not a recognizable sheet.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// No credentials available to authenticate against the backend.
    #[error("credentials missing: {0}")]
    CredentialsMissing(String),

    /// The backend has no sheet for this source id.
    #[error("sheet not found: {0}")]
    NotFound(String),

    /// Authentication with the backend failed.
    #[error("auth error: {0}")]
    Auth(String),

    /// HTTP or other transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with something we could not parse.
    #[error("malformed response: {0}")]
    Malformed(String),
}
