//! # Backend interfaces
//!
//! The sync driver talks to the outside world through these traits only.
//!
//! * [`OrderSource`] resolves customers and reports the current state of their orders. It is read-only.
//! * [`LedgerStore`] reads and writes a customer's ledger. Writes must store the total and the breakdown together or
//!   not at all.
//! * [`OrderCancellation`] looks up and cancels a single order on behalf of a customer.
//!
//! The Shopify-backed implementations live in the server crate. [`crate::SqliteLedgerStore`] is a local ledger store.
mod ledger_store;
mod order_cancellation;
mod order_source;

pub use ledger_store::{LedgerStore, LedgerStoreError};
pub use order_cancellation::{OrderCancellation, OrderCancellationError};
pub use order_source::{OrderSource, OrderSourceError};
