use std::collections::{HashMap, HashSet};

use loyalty_common::Points;
use serde::{Deserialize, Serialize};

use crate::{
    ledger_types::{LedgerAction, LedgerEntry, OrderId},
    reconciliation::OrderHistory,
};

/// The ways in which existing ledger history can break the per-order invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InconsistencyKind {
    DuplicateAward,
    DuplicateRevert,
    RevertWithoutAward,
    NonPositiveAward { points: Points },
    RevertAmountMismatch { awarded: Points, reverted: Points },
    MissingOrderId,
}

/// A violation found in a stored breakdown. The engine reports these and leaves the offending order alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerInconsistency {
    pub order_id: Option<OrderId>,
    /// Position of the offending entry in the breakdown
    pub entry_index: usize,
    #[serde(flatten)]
    pub kind: InconsistencyKind,
}

/// Per-order view of a breakdown, built once per reconciliation pass and kept current as entries are appended.
#[derive(Debug, Clone, Default)]
pub struct LedgerIndex {
    history: HashMap<OrderId, OrderHistory>,
    flagged: HashSet<OrderId>,
    inconsistencies: Vec<LedgerInconsistency>,
}

impl LedgerIndex {
    pub fn build(breakdown: &[LedgerEntry]) -> Self {
        let mut index = Self::default();
        for (i, entry) in breakdown.iter().enumerate() {
            index.scan(i, entry);
        }
        index
    }

    fn scan(&mut self, entry_index: usize, entry: &LedgerEntry) {
        if !entry.action.is_order_action() {
            return;
        }
        let Some(order_id) = entry.order_id.clone() else {
            self.inconsistencies.push(LedgerInconsistency {
                order_id: None,
                entry_index,
                kind: InconsistencyKind::MissingOrderId,
            });
            return;
        };
        let history = self.history.entry(order_id.clone()).or_default();
        let problem = match entry.action {
            LedgerAction::OrderAward if history.award.is_some() => Some(InconsistencyKind::DuplicateAward),
            LedgerAction::OrderAward if !entry.points.is_positive() => {
                history.award = Some(entry.points);
                Some(InconsistencyKind::NonPositiveAward { points: entry.points })
            },
            LedgerAction::OrderAward => {
                history.award = Some(entry.points);
                None
            },
            _ if history.reverted => Some(InconsistencyKind::DuplicateRevert),
            _ => {
                history.reverted = true;
                match history.award {
                    None => Some(InconsistencyKind::RevertWithoutAward),
                    Some(awarded) if entry.points.checked_neg() != Some(awarded) => {
                        Some(InconsistencyKind::RevertAmountMismatch { awarded, reverted: entry.points })
                    },
                    Some(_) => None,
                }
            },
        };
        if let Some(kind) = problem {
            self.flagged.insert(order_id.clone());
            self.inconsistencies.push(LedgerInconsistency { order_id: Some(order_id), entry_index, kind });
        }
    }

    pub fn history(&self, order_id: &OrderId) -> OrderHistory {
        self.history.get(order_id).copied().unwrap_or_default()
    }

    pub fn is_flagged(&self, order_id: &OrderId) -> bool {
        self.flagged.contains(order_id)
    }

    pub fn inconsistencies(&self) -> &[LedgerInconsistency] {
        &self.inconsistencies
    }

    pub fn into_inconsistencies(self) -> Vec<LedgerInconsistency> {
        self.inconsistencies
    }

    pub(crate) fn record_award(&mut self, order_id: &OrderId, points: Points) {
        self.history.entry(order_id.clone()).or_default().award = Some(points);
    }

    pub(crate) fn record_revert(&mut self, order_id: &OrderId) {
        self.history.entry(order_id.clone()).or_default().reverted = true;
    }
}
