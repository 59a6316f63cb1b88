//! # Ledger reconciliation
//!
//! Given a customer's current ledger and the current state of their orders, the [`ReconciliationEngine`] appends
//! exactly the award and revert entries that are missing. Running it again over its own output changes nothing.
//!
//! * [`decide`] holds the per-order rule.
//! * [`LedgerIndex`] summarises what a breakdown already says about each order and detects broken history.
//! * [`ReconciliationEngine`] drives a pass over a list of orders.
mod decision;
mod engine;
mod errors;
mod index;

pub use decision::{decide, OrderDecision, OrderHistory, PointsRules, DEFAULT_CURRENCY_UNITS_PER_POINT};
pub use engine::{Reconciliation, ReconciliationEngine};
pub use errors::LedgerError;
pub use index::{InconsistencyKind, LedgerIndex, LedgerInconsistency};
