use thiserror::Error;

use crate::{cancellation::CancellableOrder, ledger_types::OrderId};

#[derive(Debug, Clone, Error)]
pub enum OrderCancellationError {
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The order service is unavailable. {0}")]
    Unavailable(String),
    #[error("The order service returned invalid data. {0}")]
    InvalidData(String),
}

#[allow(async_fn_in_trait)]
pub trait OrderCancellation {
    async fn fetch_cancellable_order(&self, order_id: &OrderId) -> Result<CancellableOrder, OrderCancellationError>;

    /// Cancels the order and returns its new state.
    async fn cancel_order(&self, order_id: &OrderId) -> Result<CancellableOrder, OrderCancellationError>;
}
