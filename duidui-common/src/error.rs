// ================================================================
// File: duidui-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input from the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found error: {0}")]
    NotFound(String),

    /// Duplicate code, redeem against an inactive tier, revoke of a redeemed code.
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// No available code left in the tier at redemption time.
    #[error("Exhausted error: {0}")]
    Exhausted(String),

    /// Table read/write failure or a broken store invariant.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl Error {
    /// True for every variant that means the backing store could not be
    /// read or written.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Persistence(_) | Error::Io(_) | Error::Csv(_) | Error::Json(_)
        )
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Decode(err.to_string())
    }
}
