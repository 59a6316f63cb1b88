use thiserror::Error;

use crate::ledger_types::{CustomerRecord, OrderSnapshot};

#[derive(Debug, Clone, Error)]
pub enum OrderSourceError {
    #[error("The order source is unavailable. {0}")]
    Unavailable(String),
    #[error("The order source returned invalid data. {0}")]
    InvalidData(String),
}

#[allow(async_fn_in_trait)]
pub trait OrderSource {
    /// Resolves a customer from their email address. Returns `None` if there is no such customer.
    async fn fetch_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>, OrderSourceError>;

    /// Fetches every order the customer has placed, whatever its status.
    async fn fetch_orders_for_customer(&self, customer: &CustomerRecord)
        -> Result<Vec<OrderSnapshot>, OrderSourceError>;
}
