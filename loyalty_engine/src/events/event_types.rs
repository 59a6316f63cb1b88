use serde::{Deserialize, Serialize};

use crate::{
    ledger_types::{CustomerId, LedgerEntry},
    reconciliation::LedgerInconsistency,
};

/// Emitted for every positive entry (order award or social reward) once it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAwardedEvent {
    pub customer_id: CustomerId,
    pub entry: LedgerEntry,
}

/// Emitted for every revert entry once it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRevertedEvent {
    pub customer_id: CustomerId,
    pub entry: LedgerEntry,
}

/// Emitted when a sync finds ledger history it cannot reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerInconsistencyEvent {
    pub customer_id: CustomerId,
    pub inconsistencies: Vec<LedgerInconsistency>,
}
