use std::time::Duration;

use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::{DateTime, Utc};
use log::debug;
use loyalty_engine::{
    cancellation::CancellationPolicy,
    ledger_types::{CustomerRecord, FinancialStatus, Money, OrderId, OrderSnapshot},
    CancellationApi,
    EventProducers,
    LedgerSyncApi,
    PointsRules,
    SyncConfig,
};
use serde_json::Value;

use super::mocks::{MockLedgerVault, MockOrderBook, MockOrderCanceller};
use crate::server::{configure_routes, cors_headers, json_config, query_config};

pub const ALLOWED_ORIGIN: &str = "https://shop.example.com";
pub const CUSTOMER_GID: &str = "gid://shopify/Customer/207119551";

pub struct TestResponse {
    pub status: StatusCode,
    pub allow_origin: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Response body was not JSON")
    }

    pub fn error(&self) -> String {
        self.json()["error"].as_str().expect("No error message in response").to_string()
    }
}

pub async fn send_request<F>(req: TestRequest, configure: F) -> TestResponse
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .wrap(cors_headers(ALLOWED_ORIGIN))
        .app_data(json_config())
        .app_data(query_config())
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let allow_origin =
        res.headers().get("Access-Control-Allow-Origin").and_then(|v| v.to_str().ok()).map(String::from);
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    TestResponse { status, allow_origin, body }
}

pub async fn get_request<F>(path: &str, configure: F) -> TestResponse
where F: FnOnce(&mut ServiceConfig) {
    send_request(TestRequest::get().uri(path), configure).await
}

pub async fn post_request<F>(path: &str, body: &str, configure: F) -> TestResponse
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post()
        .uri(path)
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string());
    send_request(req, configure).await
}

/// Registers a sync API over the given mocks and every route.
pub fn with_sync_api(orders: MockOrderBook, store: MockLedgerVault) -> impl FnOnce(&mut ServiceConfig) {
    let config = SyncConfig { max_attempts: 2, retry_delay: Duration::ZERO, rules: PointsRules::default() };
    let api = LedgerSyncApi::new(orders, store, config, EventProducers::default());
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(api));
        configure_routes::<MockOrderBook, MockLedgerVault, MockOrderCanceller>(cfg);
    }
}

pub fn with_cancellation_api(canceller: MockOrderCanceller) -> impl FnOnce(&mut ServiceConfig) {
    let api = CancellationApi::new(canceller, CancellationPolicy::default());
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(api));
        configure_routes::<MockOrderBook, MockLedgerVault, MockOrderCanceller>(cfg);
    }
}

/// An order book that knows a single customer, `alice@example.com`, with the given orders.
pub fn order_book_with(orders: Vec<OrderSnapshot>) -> MockOrderBook {
    let mut book = MockOrderBook::new();
    book.expect_fetch_customer_by_email()
        .returning(|email: &str| Ok((email == "alice@example.com").then(|| CustomerRecord::new(CUSTOMER_GID, email))));
    book.expect_fetch_orders_for_customer().returning(move |_| Ok(orders.clone()));
    book
}

pub fn paid_order(id: &str, net_units: i64) -> OrderSnapshot {
    OrderSnapshot::new(OrderId::from(id), Money::from_units(net_units), FinancialStatus::Paid)
        .with_name(format!("#{id}"))
}

pub fn refunded_order(id: &str) -> OrderSnapshot {
    OrderSnapshot::new(OrderId::from(id), Money::from_units(0), FinancialStatus::Refunded).with_name(format!("#{id}"))
}

pub fn timestamp(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>().expect("Invalid timestamp")
}
