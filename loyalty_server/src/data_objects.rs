use loyalty_common::Points;
use loyalty_engine::{
    ledger_types::{LedgerEntry, LedgerState},
    reconciliation::LedgerInconsistency,
    SocialAward,
    SyncResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

impl EmailQuery {
    /// The trimmed email address, or `None` if it is blank.
    pub fn email(&self) -> Option<&str> {
        Some(self.email.trim()).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialActionRequest {
    pub email: String,
    pub action: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointsResponse {
    pub total: Points,
    pub breakdown: Vec<LedgerEntry>,
}

impl From<LedgerState> for PointsResponse {
    fn from(ledger: LedgerState) -> Self {
        Self { total: ledger.total(), breakdown: ledger.breakdown().to_vec() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub net_change: Points,
    pub total: Points,
    pub new_entries: Vec<LedgerEntry>,
    pub breakdown: Vec<LedgerEntry>,
    pub inconsistencies: Vec<LedgerInconsistency>,
}

impl From<SyncResult> for SyncResponse {
    fn from(result: SyncResult) -> Self {
        Self {
            success: true,
            net_change: result.net_change,
            total: result.total,
            new_entries: result.new_entries,
            breakdown: result.breakdown,
            inconsistencies: result.inconsistencies,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialActionResponse {
    pub success: bool,
    pub awarded: Points,
    pub total: Points,
    pub entry: LedgerEntry,
}

impl From<SocialAward> for SocialActionResponse {
    fn from(award: SocialAward) -> Self {
        Self { success: true, awarded: award.entry.points, total: award.total, entry: award.entry }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub message: String,
}
