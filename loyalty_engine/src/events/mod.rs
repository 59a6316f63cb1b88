//! Ledger events and the hooks that let other parts of the system react to them.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{LedgerInconsistencyEvent, PointsAwardedEvent, PointsRevertedEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
