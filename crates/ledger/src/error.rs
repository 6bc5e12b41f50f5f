use common::Sku;
use thiserror::Error;

/// Errors that can occur when interacting with the inventory ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The SKU does not exist in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(Sku),

    /// A database error occurred. A failure while writing the audit entry
    /// aborts the counter mutation with it; the two are one transaction.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
