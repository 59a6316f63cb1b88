//! A SQLite-backed [`crate::traits::LedgerStore`].
//!
//! Used for local development and for the engine's integration tests. In production the ledger lives in the
//! merchant's customer metafields.
mod errors;
mod sqlite_impl;

pub mod db;
pub use errors::SqliteLedgerError;
pub use sqlite_impl::SqliteLedgerStore;
