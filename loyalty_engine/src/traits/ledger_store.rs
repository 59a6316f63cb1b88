use thiserror::Error;

use crate::ledger_types::{CustomerRecord, StoredLedger};

#[derive(Debug, Clone, Error)]
pub enum LedgerStoreError {
    #[error("The ledger store is unavailable. {0}")]
    Unavailable(String),
    /// The store refused the write. Nothing was persisted.
    #[error("The ledger store rejected the update. {0}")]
    WriteRejected(String),
    #[error("Ledger store error. {0}")]
    Backend(String),
}

#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Returns the customer's stored ledger, or `None` if they have never had one.
    async fn fetch_ledger(&self, customer: &CustomerRecord) -> Result<Option<StoredLedger>, LedgerStoreError>;

    /// Persists both fields of `ledger` as a single update.
    async fn store_ledger(&self, customer: &CustomerRecord, ledger: &StoredLedger) -> Result<(), LedgerStoreError>;
}
