//! Error types for curve construction, schedule generation and persistence

use thiserror::Error;

/// Errors raised by the valuation engine
#[derive(Debug, Error)]
pub enum IrrbbError {
    /// Curve tenor label is not `<number>M` or `<number>Y`
    #[error("malformed tenor '{tenor}': expected <number>M or <number>Y")]
    MalformedTenor { tenor: String },

    /// No curve points were supplied
    #[error("curve has no points")]
    EmptyCurve,

    /// Curve points are inconsistent (length mismatch, unordered maturities, non-finite rates)
    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    /// Contract yields no usable schedule; the aggregator skips it
    #[error("degenerate schedule for contract '{contract_id}': {reason}")]
    DegenerateSchedule { contract_id: String, reason: String },

    /// Configuration could not be read or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository failure, surfaced unmodified
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IrrbbError {
    pub(crate) fn degenerate(contract_id: &str, reason: impl Into<String>) -> Self {
        IrrbbError::DegenerateSchedule {
            contract_id: contract_id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by contract repositories and result stores
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single record could not be mapped onto a contract
    #[error("row {row} ({contract_id}): {reason}")]
    InvalidRecord {
        row: usize,
        contract_id: String,
        reason: String,
    },

    /// Every row-level problem found in an input file
    #[error("{} invalid contract row(s): {}", .0.len(), .0.join("; "))]
    Validation(Vec<String>),
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, IrrbbError>;
