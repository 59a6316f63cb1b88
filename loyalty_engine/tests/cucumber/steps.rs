use std::str::FromStr;

use cucumber::{then, when};
use loyalty_common::Points;
use loyalty_engine::{ledger_types::SocialAction, LedgerError, SyncError};

use crate::cucumber::LedgerWorld;

#[when(expr = "order {word} for {word} is {word} with a net amount of {int}")]
async fn set_order(world: &mut LedgerWorld, order_id: String, email: String, status: String, net: i64) {
    world.orders().set_order(&email, &order_id, &status, net);
}

#[when(expr = "order {word} for {word} is cancelled")]
async fn cancel_order(world: &mut LedgerWorld, order_id: String, email: String) {
    world.orders().cancel_order(&email, &order_id);
}

#[when(expr = "I sync the ledger for {word}")]
async fn sync_ledger(world: &mut LedgerWorld, email: String) {
    let result = world.api().sync_customer(&email).await;
    world.last_sync = Some(result);
}

#[when(expr = "{word} is rewarded for {word}")]
async fn social_reward(world: &mut LedgerWorld, email: String, action: String) {
    let action = SocialAction::from_str(&action).expect("Unknown social action");
    let result = world.api().award_social_action(&email, action).await;
    world.last_award = Some(result);
}

#[then(expr = "the sync net change is {int}")]
async fn check_net_change(world: &mut LedgerWorld, net: i64) {
    assert_eq!(world.last_sync().net_change, Points::new(net), "Net change is incorrect");
}

#[then(expr = "the sync added {int} entries")]
async fn check_new_entries(world: &mut LedgerWorld, count: usize) {
    assert_eq!(world.last_sync().new_entries.len(), count, "Number of new entries is incorrect");
}

#[then(expr = "the sync reports {int} inconsistencies")]
async fn check_inconsistencies(world: &mut LedgerWorld, count: usize) {
    assert_eq!(world.last_sync().inconsistencies.len(), count, "Number of inconsistencies is incorrect");
}

#[then(expr = "the ledger for {word} has a total of {int} points")]
async fn check_total(world: &mut LedgerWorld, email: String, total: i64) {
    let ledger = world.stored_ledger(&email).await.expect("No ledger has been stored");
    assert_eq!(ledger.total(), Points::new(total), "Total is incorrect");
    assert!(ledger.is_consistent(), "Total does not match the breakdown");
}

#[then(expr = "the ledger for {word} has {int} entries")]
async fn check_entry_count(world: &mut LedgerWorld, email: String, count: usize) {
    let ledger = world.stored_ledger(&email).await.expect("No ledger has been stored");
    assert_eq!(ledger.len(), count, "Number of entries is incorrect");
}

#[then(expr = "there is no stored ledger for {word}")]
async fn check_no_ledger(world: &mut LedgerWorld, email: String) {
    assert!(world.stored_ledger(&email).await.is_none(), "A ledger was stored");
}

#[then(expr = "entry #{int} for {word} is {word} of {int} points labelled {string}")]
async fn check_entry(world: &mut LedgerWorld, index: usize, email: String, action: String, points: i64, label: String) {
    let ledger = world.stored_ledger(&email).await.expect("No ledger has been stored");
    let entry = ledger.breakdown().get(index - 1).unwrap_or_else(|| panic!("There is no entry #{index}"));
    assert_eq!(entry.action.as_str(), action, "Action is incorrect");
    assert_eq!(entry.points, Points::new(points), "Points are incorrect");
    assert_eq!(entry.label, label, "Label is incorrect");
}

#[then(expr = "the sync fails with {word}")]
async fn check_sync_failure(world: &mut LedgerWorld, reason: String) {
    let err = match world.last_sync.as_ref().expect("No sync has run") {
        Ok(_) => panic!("Sync succeeded unexpectedly"),
        Err(e) => e,
    };
    match reason.as_str() {
        "CustomerNotFound" => assert!(matches!(err, SyncError::CustomerNotFound(_)), "Unexpected error {err}"),
        "TotalMismatch" => {
            assert!(matches!(err, SyncError::Ledger(LedgerError::TotalMismatch { .. })), "Unexpected error {err}")
        },
        "Malformed" => {
            assert!(matches!(err, SyncError::Ledger(LedgerError::Malformed(_))), "Unexpected error {err}")
        },
        _ => panic!("Unknown reason {reason}"),
    }
}

#[then(expr = "the reward is {int} points")]
async fn check_reward(world: &mut LedgerWorld, points: i64) {
    let award = match world.last_award.as_ref().expect("No reward was attempted") {
        Ok(award) => award,
        Err(e) => panic!("Reward failed: {e}"),
    };
    assert_eq!(award.entry.points, Points::new(points), "Reward is incorrect");
}

#[then("the reward is refused as a repeat")]
async fn check_repeat_reward(world: &mut LedgerWorld) {
    let result = world.last_award.as_ref().expect("No reward was attempted");
    assert!(
        matches!(result, Err(SyncError::Ledger(LedgerError::AlreadyRewarded(_)))),
        "Expected a repeat refusal, got {result:?}"
    );
}
