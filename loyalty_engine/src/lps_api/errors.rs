use thiserror::Error;

use crate::{
    cancellation::CancellationRefusal,
    ledger_types::OrderId,
    reconciliation::LedgerError,
    traits::{LedgerStoreError, OrderCancellationError, OrderSourceError},
};

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("No customer exists with email {0}")]
    CustomerNotFound(String),
    #[error("An upstream service is unavailable. {0}")]
    UpstreamUnavailable(String),
    /// Neither the total nor the breakdown was written. Retry the whole cycle.
    #[error("The ledger update was rejected. {0}")]
    WriteRejected(String),
    #[error("Order data could not be interpreted. {0}")]
    InvalidOrderData(String),
    #[error("Ledger store error. {0}")]
    StoreError(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SyncError {
    /// Only transient upstream failures are retried by the driver.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }
}

impl From<OrderSourceError> for SyncError {
    fn from(e: OrderSourceError) -> Self {
        match e {
            OrderSourceError::Unavailable(s) => Self::UpstreamUnavailable(s),
            OrderSourceError::InvalidData(s) => Self::InvalidOrderData(s),
        }
    }
}

impl From<LedgerStoreError> for SyncError {
    fn from(e: LedgerStoreError) -> Self {
        match e {
            LedgerStoreError::Unavailable(s) => Self::UpstreamUnavailable(s),
            LedgerStoreError::WriteRejected(s) => Self::WriteRejected(s),
            LedgerStoreError::Backend(s) => Self::StoreError(s),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CancellationError {
    #[error("{0}")]
    Refused(#[from] CancellationRefusal),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The order service is unavailable. {0}")]
    UpstreamUnavailable(String),
    #[error("The order service returned invalid data. {0}")]
    InvalidOrderData(String),
}

impl From<OrderCancellationError> for CancellationError {
    fn from(e: OrderCancellationError) -> Self {
        match e {
            OrderCancellationError::OrderNotFound(id) => Self::OrderNotFound(id),
            OrderCancellationError::Unavailable(s) => Self::UpstreamUnavailable(s),
            OrderCancellationError::InvalidData(s) => Self::InvalidOrderData(s),
        }
    }
}
