use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    cancellation::{check_cancellable, CancellableOrder, CancellationPolicy},
    ledger_types::OrderId,
    lps_api::errors::CancellationError,
    traits::OrderCancellation,
};

/// Lets customers cancel their own orders, subject to a [`CancellationPolicy`].
pub struct CancellationApi<C> {
    backend: C,
    policy: CancellationPolicy,
}

impl<C> Debug for CancellationApi<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CancellationApi ({}h window)", self.policy.window.num_hours())
    }
}

impl<C> CancellationApi<C> {
    pub fn new(backend: C, policy: CancellationPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> &CancellationPolicy {
        &self.policy
    }
}

impl<C: OrderCancellation> CancellationApi<C> {
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<CancellableOrder, CancellationError> {
        let order = self.backend.fetch_cancellable_order(order_id).await?;
        if let Err(refusal) = check_cancellable(&order, &self.policy, Utc::now()) {
            info!("🚫️ Cancellation of order {order_id} refused. {refusal}");
            return Err(refusal.into());
        }
        let cancelled = self.backend.cancel_order(order_id).await?;
        info!("🚫️ Order {order_id} has been cancelled");
        Ok(cancelled)
    }
}
