use actix_web::http::StatusCode;
use chrono::{Duration, Utc};
use loyalty_engine::{cancellation::CancellableOrder, ledger_types::OrderId, OrderCancellationError};

use super::{helpers::*, mocks::MockOrderCanceller};

fn order(status: &str, hours_old: i64, tags: &[&str]) -> CancellableOrder {
    CancellableOrder {
        order_id: OrderId::from("5001"),
        financial_status: status.to_string(),
        created_at: Utc::now() - Duration::hours(hours_old),
        cancelled: false,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn canceller_for(found: CancellableOrder, expect_cancel: bool) -> MockOrderCanceller {
    let mut canceller = MockOrderCanceller::new();
    let cancelled = CancellableOrder { cancelled: true, ..found.clone() };
    canceller
        .expect_fetch_cancellable_order()
        .withf(|id| id.as_str() == "5001")
        .times(1)
        .returning(move |_| Ok(found.clone()));
    canceller.expect_cancel_order().times(usize::from(expect_cancel)).returning(move |_| Ok(cancelled.clone()));
    canceller
}

#[actix_web::test]
async fn recent_paid_order_is_cancelled() {
    let _ = env_logger::try_init().ok();
    let canceller = canceller_for(order("paid", 2, &["vip"]), true);
    let res = post_request("/orders/cancel", r#"{"orderId": "5001"}"#, with_cancellation_api(canceller)).await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["orderId"], "5001");
}

#[actix_web::test]
async fn dispatched_order_is_refused() {
    let _ = env_logger::try_init().ok();
    let canceller = canceller_for(order("paid", 2, &["Dispatched"]), false);
    let res = post_request("/orders/cancel", r#"{"orderId": "5001"}"#, with_cancellation_api(canceller)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "The order has already been dispatched.");
}

#[actix_web::test]
async fn old_order_is_refused() {
    let _ = env_logger::try_init().ok();
    let canceller = canceller_for(order("paid", 25, &[]), false);
    let res = post_request("/orders/cancel", r#"{"orderId": "5001"}"#, with_cancellation_api(canceller)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Orders can only be cancelled within 24 hours of being placed.");
}

#[actix_web::test]
async fn unpaid_order_is_refused() {
    let _ = env_logger::try_init().ok();
    let canceller = canceller_for(order("pending", 1, &[]), false);
    let res = post_request("/orders/cancel", r#"{"orderId": "5001"}"#, with_cancellation_api(canceller)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Only paid orders can be cancelled. This order is 'pending'.");
}

#[actix_web::test]
async fn unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut canceller = MockOrderCanceller::new();
    canceller
        .expect_fetch_cancellable_order()
        .returning(|id| Err(OrderCancellationError::OrderNotFound(id.clone())));
    canceller.expect_cancel_order().times(0);
    let res = post_request("/orders/cancel", r#"{"orderId": "9999"}"#, with_cancellation_api(canceller)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "The data was not found. Order not found: 9999");
}

#[actix_web::test]
async fn missing_order_id() {
    let _ = env_logger::try_init().ok();
    let configure = with_cancellation_api(MockOrderCanceller::new());
    let res = post_request("/orders/cancel", r#"{"order": "5001"}"#, configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.error().starts_with("Could not read request body"));
    let configure = with_cancellation_api(MockOrderCanceller::new());
    let res = post_request("/orders/cancel", r#"{"orderId": " "}"#, configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Could not read request body: An order id is required");
}
