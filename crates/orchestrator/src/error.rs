use aggregator::AggregatorError;
use ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur while orchestrating a sync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The ledger mutation failed; nothing was pushed to any channel.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A targeted channel operation failed after the local state settled.
    #[error(transparent)]
    Aggregator(#[from] AggregatorError),
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, SyncError>;
