//! Rules for customer-initiated order cancellation.
//!
//! Cancelling an order does not touch the ledger. The revert is picked up by the next sync, like any other
//! cancellation.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger_types::OrderId;

pub const DEFAULT_CANCELLATION_WINDOW_HOURS: i64 = 24;
pub const DISPATCHED_TAG: &str = "dispatched";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPolicy {
    pub window: Duration,
    pub dispatched_tag: String,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self { window: Duration::hours(DEFAULT_CANCELLATION_WINDOW_HOURS), dispatched_tag: DISPATCHED_TAG.into() }
    }
}

impl CancellationPolicy {
    pub fn with_window_hours(hours: i64) -> Self {
        Self { window: Duration::hours(hours), ..Default::default() }
    }
}

/// The facts about an order that the cancellation policy looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellableOrder {
    pub order_id: OrderId,
    /// The raw financial status string, e.g. `paid`
    pub financial_status: String,
    pub created_at: DateTime<Utc>,
    pub cancelled: bool,
    pub tags: Vec<String>,
}

impl CancellableOrder {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.trim().eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CancellationRefusal {
    #[error("The order has already been cancelled.")]
    AlreadyCancelled,
    #[error("Only paid orders can be cancelled. This order is '{0}'.")]
    NotPaid(String),
    #[error("Orders can only be cancelled within {0} hours of being placed.")]
    WindowExpired(i64),
    #[error("The order has already been dispatched.")]
    AlreadyDispatched,
}

pub fn check_cancellable(
    order: &CancellableOrder,
    policy: &CancellationPolicy,
    now: DateTime<Utc>,
) -> Result<(), CancellationRefusal> {
    if order.cancelled {
        return Err(CancellationRefusal::AlreadyCancelled);
    }
    if !order.financial_status.eq_ignore_ascii_case("paid") {
        return Err(CancellationRefusal::NotPaid(order.financial_status.clone()));
    }
    if now - order.created_at > policy.window {
        return Err(CancellationRefusal::WindowExpired(policy.window.num_hours()));
    }
    if order.has_tag(&policy.dispatched_tag) {
        return Err(CancellationRefusal::AlreadyDispatched);
    }
    Ok(())
}
