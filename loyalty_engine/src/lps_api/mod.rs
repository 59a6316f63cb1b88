//! # Loyalty points public API
//!
//! The pattern is the same for every API in this module: build it from backends that implement the traits in
//! [`crate::traits`], then call its async methods.
//!
//! ```rust,ignore
//! use loyalty_engine::{EventProducers, LedgerSyncApi, SyncConfig};
//! let api = LedgerSyncApi::new(order_source, ledger_store, SyncConfig::default(), EventProducers::default());
//! let result = api.sync_customer("alice@example.com").await?;
//! println!("{} new entries, net change {}", result.new_entries.len(), result.net_change);
//! ```
//!
//! * [`ledger_sync_api`] runs read-reconcile-write cycles, serialised per customer, and grants social-action rewards.
//! * [`cancellation_api`] applies the customer cancellation policy and cancels orders.
pub mod cancellation_api;
mod customer_locks;
pub mod errors;
pub mod ledger_sync_api;
pub mod sync_objects;

pub use customer_locks::CustomerLocks;
