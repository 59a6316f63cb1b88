use std::time::Duration;

use loyalty_common::Points;
use serde::Serialize;

use crate::{
    ledger_types::{CustomerId, LedgerEntry},
    reconciliation::{LedgerInconsistency, PointsRules},
};

pub const DEFAULT_SYNC_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_SYNC_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Total number of attempts at a sync cycle, including the first. Always at least 1.
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub rules: PointsRules,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_SYNC_MAX_ATTEMPTS,
            retry_delay: DEFAULT_SYNC_RETRY_DELAY,
            rules: PointsRules::default(),
        }
    }
}

/// The result of a successful sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub customer_id: CustomerId,
    pub net_change: Points,
    pub total: Points,
    pub new_entries: Vec<LedgerEntry>,
    pub breakdown: Vec<LedgerEntry>,
    pub inconsistencies: Vec<LedgerInconsistency>,
    /// Whether the ledger was written in this cycle
    pub stored: bool,
}

/// The result of a successful social-action reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAward {
    pub customer_id: CustomerId,
    pub entry: LedgerEntry,
    pub total: Points,
}
