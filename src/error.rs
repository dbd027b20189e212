use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

/// Inconsistent-input conditions the engine can report.
///
/// These reflect a host/state synchronization bug rather than a contract
/// violation: every operation that can produce one treats it as a no-op,
/// and the drag pipeline logs it instead of propagating.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}
