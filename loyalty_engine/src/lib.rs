//! Loyalty Points Engine
//!
//! This library keeps a per-customer ledger of loyalty points in step with the customer's orders. It is
//! provider-agnostic: orders come from an [`OrderSource`] and ledgers are kept in a [`LedgerStore`].
//!
//! The library is divided into three main sections:
//! 1. The reconciliation engine ([`mod@reconciliation`]). A pure, synchronous function of the current ledger and the
//!    current order snapshots that appends any missing award or revert entries. It never rewrites history.
//! 2. The public API ([`LedgerSyncApi`], [`CancellationApi`]). These run read-reconcile-write cycles against the
//!    backends, serialised per customer, and apply the customer cancellation policy.
//! 3. Backends. The [`traits`] define what a backend must provide. [`SqliteLedgerStore`] is a local ledger store; the
//!    Shopify-backed implementations live in the server.
//!
//! The engine also emits events when points are awarded or reverted, and when broken ledger history is found. See
//! [`events`] for how to hook into them.
pub mod cancellation;
pub mod events;
pub mod ledger_types;
mod lps_api;
pub mod reconciliation;
pub mod social;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use events::{EventHandlers, EventHooks, EventProducers};
pub use lps_api::{
    cancellation_api::CancellationApi,
    errors::{CancellationError, SyncError},
    ledger_sync_api::LedgerSyncApi,
    sync_objects::{SocialAward, SyncConfig, SyncResult, DEFAULT_SYNC_MAX_ATTEMPTS, DEFAULT_SYNC_RETRY_DELAY},
    CustomerLocks,
};
pub use reconciliation::{LedgerError, PointsRules, ReconciliationEngine};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteLedgerError, SqliteLedgerStore};
pub use traits::{LedgerStore, LedgerStoreError, OrderCancellation, OrderCancellationError, OrderSource, OrderSourceError};
