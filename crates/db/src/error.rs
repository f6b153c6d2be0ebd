use skilltrack_core::error::CoreError;

/// Errors from operations that pair a ledger entry with an XP mutation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Raised inside the transaction; the transaction is rolled back on drop.
    #[error(transparent)]
    Core(#[from] CoreError),
}
