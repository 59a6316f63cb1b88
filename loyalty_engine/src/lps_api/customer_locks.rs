use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use log::*;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::ledger_types::CustomerId;

/// One async mutex per customer. Cycles for the same customer queue up behind each other; different customers never
/// contend.
///
/// Clones share the same lock table.
#[derive(Debug, Clone, Default)]
pub struct CustomerLocks {
    locks: Arc<Mutex<HashMap<CustomerId, Arc<AsyncMutex<()>>>>>,
}

impl CustomerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, customer_id: &CustomerId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Nobody holds or waits on a lock whose only reference is the table's
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(customer_id.clone()).or_default())
        };
        trace!("🔒️ Waiting for ledger lock on customer {customer_id}");
        lock.lock_owned().await
    }

    /// The number of customers with a lock currently held or awaited.
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.values().filter(|lock| Arc::strong_count(lock) > 1).count()
    }
}
