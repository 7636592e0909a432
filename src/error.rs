//! Error taxonomy shared by the store, the codec and the HTTP layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed body or a missing id/type on update and delete.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid transaction type: '{0}'")]
    InvalidType(String),

    /// A required field is missing or not numeric. Carries the variant label, e.g. `REG/OPR/VPN`.
    #[error("incomplete {0} data")]
    IncompleteData(String),

    #[error("record '{0}' not found")]
    NotFound(String),

    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    /// The backing store failed or did not answer in time.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
