use std::{future::Future, pin::Pin};

use log::*;
use loyalty_engine::{
    events::{LedgerInconsistencyEvent, PointsAwardedEvent, PointsRevertedEvent},
    EventHandlers,
    EventHooks,
};

pub const LEDGER_EVENT_BUFFER_SIZE: usize = 25;

/// Hooks that write every ledger event to the log. Inconsistencies are logged at `warn` so that broken ledger history
/// gets looked at.
pub fn create_ledger_log_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks
        .on_points_awarded(|ev: PointsAwardedEvent| {
            info!("📬️ {} earned {} ({})", ev.customer_id, ev.entry.points, ev.entry.label);
            no_op()
        })
        .on_points_reverted(|ev: PointsRevertedEvent| {
            info!("📬️ {} lost {} ({})", ev.customer_id, ev.entry.points.abs(), ev.entry.label);
            no_op()
        })
        .on_inconsistency(|ev: LedgerInconsistencyEvent| {
            for inconsistency in &ev.inconsistencies {
                let order_id = inconsistency.order_id.as_ref().map(|id| id.as_str()).unwrap_or("(none)");
                warn!(
                    "📬️ Ledger for {} has inconsistent history for order {order_id} at entry {}: {:?}",
                    ev.customer_id, inconsistency.entry_index, inconsistency.kind
                );
            }
            no_op()
        });
    EventHandlers::new(LEDGER_EVENT_BUFFER_SIZE, hooks)
}

fn no_op() -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async {})
}
