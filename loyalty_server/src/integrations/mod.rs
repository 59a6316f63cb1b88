pub mod ledger_events;
pub mod shopify;
