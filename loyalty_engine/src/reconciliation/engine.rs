use chrono::{DateTime, Utc};
use log::*;
use loyalty_common::Points;
use serde::Serialize;

use crate::{
    ledger_types::{points_overflow, LedgerEntry, LedgerState, OrderSnapshot},
    reconciliation::{decide, LedgerError, LedgerIndex, LedgerInconsistency, OrderDecision, PointsRules},
};

/// The outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub ledger: LedgerState,
    pub net_change: Points,
    /// The entries appended in this pass, in order
    pub new_entries: Vec<LedgerEntry>,
    pub inconsistencies: Vec<LedgerInconsistency>,
}

impl Reconciliation {
    /// True when the pass appended anything, even if the appended entries sum to zero.
    pub fn needs_write(&self) -> bool {
        !self.new_entries.is_empty()
    }
}

/// Computes the entries a ledger is missing, given the current state of a customer's orders.
///
/// The engine performs no I/O. Its only inputs are the current ledger, the order snapshots and a clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine {
    rules: PointsRules,
}

impl ReconciliationEngine {
    pub fn new(rules: PointsRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PointsRules {
        &self.rules
    }

    pub fn reconcile(&self, current: &LedgerState, orders: &[OrderSnapshot]) -> Result<Reconciliation, LedgerError> {
        self.reconcile_at(current, orders, Utc::now())
    }

    /// Reconciles `orders` against `current`, stamping any new entries with `now`.
    ///
    /// Orders are processed in the order given. Orders whose existing history is already inconsistent are skipped and
    /// reported; they never receive new entries.
    pub fn reconcile_at(
        &self,
        current: &LedgerState,
        orders: &[OrderSnapshot],
        now: DateTime<Utc>,
    ) -> Result<Reconciliation, LedgerError> {
        if let Err(e) = current.check_consistency() {
            warn!("⚖️ Refusing to reconcile. {e}");
            return Err(e);
        }
        let mut index = LedgerIndex::build(current.breakdown());
        let mut ledger = current.clone();
        let mut new_entries = Vec::new();
        for order in orders {
            if index.is_flagged(&order.order_id) {
                debug!("⚖️ Order {} has inconsistent history. Skipping it.", order.order_id);
                continue;
            }
            let history = index.history(&order.order_id);
            let entry = match decide(order, &history, &self.rules) {
                OrderDecision::None => continue,
                OrderDecision::Award(points) => {
                    trace!("⚖️ Awarding {points} for order {}", order.order_id);
                    index.record_award(&order.order_id, points);
                    LedgerEntry::order_award(order, points, now)
                },
                OrderDecision::Revert(awarded) => {
                    trace!("⚖️ Reverting {awarded} for order {}", order.order_id);
                    index.record_revert(&order.order_id);
                    LedgerEntry::order_revert(order, awarded, now)
                },
            };
            ledger.append(entry.clone())?;
            new_entries.push(entry);
        }
        let net_change = ledger.total().checked_sub(current.total()).ok_or_else(points_overflow)?;
        let inconsistencies = index.into_inconsistencies();
        if !inconsistencies.is_empty() {
            warn!("⚖️ {} inconsistencies found in the ledger history", inconsistencies.len());
        }
        debug!("⚖️ Reconciled {} orders. {} new entries, net change {net_change}", orders.len(), new_entries.len());
        Ok(Reconciliation { ledger, net_change, new_entries, inconsistencies })
    }
}
