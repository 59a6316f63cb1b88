use chrono::{DateTime, Utc};
use log::*;

use crate::{
    ledger_types::{LedgerAction, LedgerEntry, LedgerState, SocialAction},
    reconciliation::LedgerError,
};

pub fn has_been_rewarded(ledger: &LedgerState, action: SocialAction) -> bool {
    ledger.breakdown().iter().any(|e| e.action == LedgerAction::Social(action))
}

/// Appends the fixed reward for `action` to the ledger and returns the new entry.
///
/// Each social action is rewarded at most once per customer.
pub fn award_social_action(
    ledger: &mut LedgerState,
    action: SocialAction,
    now: DateTime<Utc>,
) -> Result<LedgerEntry, LedgerError> {
    ledger.check_consistency()?;
    if has_been_rewarded(ledger, action) {
        debug!("🎁️ '{action}' has already been rewarded");
        return Err(LedgerError::AlreadyRewarded(action));
    }
    let entry = LedgerEntry::social(action, now);
    ledger.append(entry.clone())?;
    debug!("🎁️ Awarded {} for '{action}'", entry.points);
    Ok(entry)
}
