//! The per-order award/revert decision.
//!
//! [`decide`] is the whole business rule of the ledger. It is a pure function of the order snapshot, what the ledger
//! already says about that order, and the points rules.
use loyalty_common::Points;
use serde::{Deserialize, Serialize};

use crate::{ledger_types::OrderSnapshot, reconciliation::LedgerError};

pub const DEFAULT_CURRENCY_UNITS_PER_POINT: i64 = 10;

/// How many currency units earn one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRules {
    currency_units_per_point: i64,
}

impl Default for PointsRules {
    fn default() -> Self {
        Self { currency_units_per_point: DEFAULT_CURRENCY_UNITS_PER_POINT }
    }
}

impl PointsRules {
    pub fn new(currency_units_per_point: i64) -> Result<Self, LedgerError> {
        if currency_units_per_point <= 0 {
            return Err(LedgerError::InvalidRules(format!(
                "Currency units per point must be positive, got {currency_units_per_point}"
            )));
        }
        Ok(Self { currency_units_per_point })
    }

    pub fn currency_units_per_point(&self) -> i64 {
        self.currency_units_per_point
    }

    /// `floor(net_amount / unit)`. Negative net amounts floor towards negative infinity, and so never award.
    pub fn points_for(&self, order: &OrderSnapshot) -> Points {
        let cents_per_point = self.currency_units_per_point.saturating_mul(crate::ledger_types::Money::MINOR_UNITS);
        Points::new(order.net_amount.cents().div_euclid(cents_per_point))
    }
}

/// What the ledger already records for one order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderHistory {
    /// The magnitude of the existing award, if any
    pub award: Option<Points>,
    pub reverted: bool,
}

impl OrderHistory {
    pub fn awarded(points: Points) -> Self {
        Self { award: Some(points), reverted: false }
    }

    pub fn is_awarded(&self) -> bool {
        self.award.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDecision {
    None,
    /// Append an award of the given (positive) amount
    Award(Points),
    /// Append a revert cancelling an award of the given (positive) magnitude
    Revert(Points),
}

pub fn decide(order: &OrderSnapshot, history: &OrderHistory, rules: &PointsRules) -> OrderDecision {
    let annulled = order.is_cancelled || order.financial_status.is_refunded();
    if annulled {
        return match history.award {
            Some(awarded) if !history.reverted => OrderDecision::Revert(awarded),
            _ => OrderDecision::None,
        };
    }
    let points = rules.points_for(order);
    if points.is_positive() && order.financial_status.is_paid() && !history.is_awarded() {
        return OrderDecision::Award(points);
    }
    OrderDecision::None
}
