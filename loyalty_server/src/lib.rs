//! # Loyalty points server
//! The HTTP front end of the loyalty points ledger. It is responsible for:
//! * Syncing a customer's ledger with their Shopify orders on request.
//! * Serving the current points total and breakdown.
//! * Granting one-off social action rewards.
//! * Letting customers cancel recent, undispatched orders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /health`: Returns 200 OK.
//! * `GET|POST /points/sync?email=`: Runs a sync for the customer and returns the changes.
//! * `GET /points?email=`: The customer's stored total and breakdown.
//! * `POST /points/action`: Social action reward. Body: `{"email", "action"}`.
//! * `POST /orders/cancel`: Customer order cancellation. Body: `{"orderId"}`.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod shopify_order;

#[cfg(test)]
mod endpoint_tests;
