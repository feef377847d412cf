// Core error type

use std::fmt;

/// Errors surfaced by the store, ledger and tool layers.
///
/// A duplicate badge is not an error: `insert_if_absent` returns `Ok(false)`.
#[derive(Debug)]
pub enum LedgerError {
    /// Rejected input on a write or tool path
    InvalidInput(String),
    /// The SQLite backend failed; propagated as-is, never retried
    StorageUnavailable(rusqlite::Error),
    /// Failure inside the crate, e.g. encoding a tool result
    Internal(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            LedgerError::StorageUnavailable(err) => write!(f, "storage unavailable: {}", err),
            LedgerError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::StorageUnavailable(err) => Some(err),
            LedgerError::InvalidInput(_) | LedgerError::Internal(_) => None,
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::StorageUnavailable(err)
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Internal(err.to_string())
    }
}

impl LedgerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        LedgerError::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        LedgerError::Internal(msg.into())
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
