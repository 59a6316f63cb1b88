use actix_web::{http::StatusCode, test::TestRequest};
use loyalty_engine::{
    ledger_types::{LedgerEntry, LedgerState, SocialAction, StoredLedger},
    LedgerStoreError,
    OrderSourceError,
};

use super::{
    helpers::*,
    mocks::{MockLedgerVault, MockOrderBook},
};

const O1_AWARD: &str = r#"[{"action":"order_award","orderId":"O1","label":"Order Bonus (#O1)","points":10,"date":"2024-06-01T12:00:00Z"}]"#;

fn stored(total: &str, breakdown: &str) -> StoredLedger {
    StoredLedger { total: total.to_string(), breakdown: breakdown.to_string() }
}

fn empty_vault() -> MockLedgerVault {
    let mut vault = MockLedgerVault::new();
    vault.expect_fetch_ledger().returning(|_| Ok(None));
    vault
}

#[actix_web::test]
async fn first_sync_awards_points_for_a_paid_order() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![paid_order("O1", 100)]);
    let mut vault = empty_vault();
    vault
        .expect_store_ledger()
        .withf(|customer, ledger| customer.id.as_str() == CUSTOMER_GID && ledger.total == "10")
        .times(1)
        .returning(|_, _| Ok(()));
    let res = get_request("/points/sync?email=alice@example.com", with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["netChange"], 10);
    assert_eq!(json["total"], 10);
    assert_eq!(json["newEntries"][0]["action"], "order_award");
    assert_eq!(json["newEntries"][0]["orderId"], "O1");
    assert_eq!(json["breakdown"].as_array().unwrap().len(), 1);
    assert!(json["inconsistencies"].as_array().unwrap().is_empty());
    assert_eq!(res.allow_origin.as_deref(), Some(ALLOWED_ORIGIN));
}

#[actix_web::test]
async fn refunded_order_is_reverted() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![refunded_order("O1")]);
    let mut vault = MockLedgerVault::new();
    vault.expect_fetch_ledger().returning(|_| Ok(Some(stored("10", O1_AWARD))));
    vault.expect_store_ledger().withf(|_, ledger| ledger.total == "0").times(1).returning(|_, _| Ok(()));
    let res = post_request("/points/sync?email=alice@example.com", "", with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["netChange"], -10);
    assert_eq!(json["total"], 0);
    assert_eq!(json["newEntries"][0]["action"], "order_revert");
    assert_eq!(json["newEntries"][0]["points"], -10);
    assert_eq!(json["breakdown"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn up_to_date_ledger_is_not_written() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![paid_order("O1", 100), paid_order("O2", 7)]);
    let mut vault = MockLedgerVault::new();
    vault.expect_fetch_ledger().returning(|_| Ok(Some(stored("10", O1_AWARD))));
    vault.expect_store_ledger().times(0);
    let res = get_request("/points/sync?email=alice@example.com", with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["netChange"], 0);
    assert_eq!(json["total"], 10);
    assert!(json["newEntries"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn sync_without_email() {
    let _ = env_logger::try_init().ok();
    let res = get_request("/points/sync", with_sync_api(MockOrderBook::new(), MockLedgerVault::new())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Invalid query. An email address is required");
    let res = get_request("/points/sync?email=%20", with_sync_api(MockOrderBook::new(), MockLedgerVault::new())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn sync_for_unknown_customer() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![]);
    let res = get_request("/points/sync?email=bob@example.com", with_sync_api(orders, MockLedgerVault::new())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "The data was not found. Customer not found: bob@example.com");
}

#[actix_web::test]
async fn sync_retries_when_shopify_is_down() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderBook::new();
    orders
        .expect_fetch_customer_by_email()
        .times(2)
        .returning(|_| Err(OrderSourceError::Unavailable("timeout".into())));
    let res = get_request("/points/sync?email=alice@example.com", with_sync_api(orders, MockLedgerVault::new())).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(res.error().contains("timeout"));
}

#[actix_web::test]
async fn rejected_write_is_reported() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![paid_order("O1", 100)]);
    let mut vault = empty_vault();
    vault
        .expect_store_ledger()
        .times(1)
        .returning(|_, _| Err(LedgerStoreError::WriteRejected("Value is invalid".into())));
    let res = get_request("/points/sync?email=alice@example.com", with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert!(res.error().contains("Value is invalid"));
}

#[actix_web::test]
async fn mismatched_total_refuses_to_sync() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![paid_order("O2", 50)]);
    let mut vault = MockLedgerVault::new();
    vault.expect_fetch_ledger().returning(|_| Ok(Some(stored("25", O1_AWARD))));
    vault.expect_store_ledger().times(0);
    let res = get_request("/points/sync?email=alice@example.com", with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.error().starts_with("The customer's ledger is inconsistent"));
}

#[actix_web::test]
async fn overflowing_ledger_is_reported() {
    let _ = env_logger::try_init().ok();
    let breakdown = r#"[
        {"action":"instagram","label":"Followed Instagram","points":9223372036854775807,"date":"2024-01-01T00:00:00Z"},
        {"action":"facebook","label":"Liked Facebook","points":1,"date":"2024-01-02T00:00:00Z"}
    ]"#;
    let orders = order_book_with(vec![paid_order("O1", 100)]);
    let mut vault = MockLedgerVault::new();
    vault.expect_fetch_ledger().returning(move |_| Ok(Some(stored("0", breakdown))));
    vault.expect_store_ledger().times(0);
    let res = get_request("/points/sync?email=alice@example.com", with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.error().starts_with("The customer's ledger is inconsistent"));
}

#[actix_web::test]
async fn fetch_points() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![]);
    let mut vault = MockLedgerVault::new();
    vault.expect_fetch_ledger().returning(|_| Ok(Some(stored("10", O1_AWARD))));
    let res = get_request("/points?email=alice@example.com", with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["total"], 10);
    assert_eq!(json["breakdown"][0]["label"], "Order Bonus (#O1)");
    assert_eq!(json["breakdown"][0]["date"], "2024-06-01T12:00:00Z");
}

#[actix_web::test]
async fn fetch_points_without_a_ledger() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![]);
    let res = get_request("/points?email=alice@example.com", with_sync_api(orders, empty_vault())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, r#"{"total":0,"breakdown":[]}"#);
}

#[actix_web::test]
async fn social_action_is_rewarded_once() {
    let _ = env_logger::try_init().ok();
    let orders = order_book_with(vec![]);
    let mut vault = empty_vault();
    vault.expect_store_ledger().withf(|_, ledger| ledger.total == "50").times(1).returning(|_, _| Ok(()));
    let body = r#"{"email": "alice@example.com", "action": "instagram"}"#;
    let res = post_request("/points/action", body, with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["awarded"], 50);
    assert_eq!(json["total"], 50);
    assert_eq!(json["entry"]["label"], "Followed Instagram");

    let entry = LedgerEntry::social(SocialAction::Instagram, timestamp("2024-06-01T12:00:00Z"));
    let encoded = LedgerState::from_entries(vec![entry]).unwrap().to_stored().unwrap();
    let orders = order_book_with(vec![]);
    let mut vault = MockLedgerVault::new();
    vault.expect_fetch_ledger().returning(move |_| Ok(Some(encoded.clone())));
    vault.expect_store_ledger().times(0);
    let res = post_request("/points/action", body, with_sync_api(orders, vault)).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.error().contains("instagram"));
}

#[actix_web::test]
async fn unknown_social_action() {
    let _ = env_logger::try_init().ok();
    let body = r#"{"email": "alice@example.com", "action": "tiktok"}"#;
    let configure = with_sync_api(MockOrderBook::new(), MockLedgerVault::new());
    let res = post_request("/points/action", body, configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Could not read request body: Unknown social action: tiktok");
}

#[actix_web::test]
async fn malformed_body() {
    let _ = env_logger::try_init().ok();
    let configure = with_sync_api(MockOrderBook::new(), MockLedgerVault::new());
    let res = post_request("/points/action", "{not json", configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.error().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn preflight_requests_succeed() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::default().method(actix_web::http::Method::OPTIONS).uri("/points/sync");
    let res = send_request(req, with_sync_api(MockOrderBook::new(), MockLedgerVault::new())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.allow_origin.as_deref(), Some(ALLOWED_ORIGIN));
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let res = get_request("/health", with_sync_api(MockOrderBook::new(), MockLedgerVault::new())).await;
    assert_eq!(res.status, StatusCode::OK);
}
