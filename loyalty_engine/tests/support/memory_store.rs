use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
        Mutex,
    },
};

use loyalty_engine::{
    ledger_types::{CustomerId, CustomerRecord, StoredLedger},
    LedgerStore,
    LedgerStoreError,
};

/// An in-memory ledger store that can be told to reject writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    ledgers: Arc<Mutex<HashMap<CustomerId, StoredLedger>>>,
    rejections: Arc<AtomicU32>,
    writes: Arc<AtomicU32>,
}

impl MemoryLedgerStore {
    pub fn reject_next_writes(&self, count: u32) {
        self.rejections.store(count, Ordering::SeqCst);
    }

    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn get(&self, customer_id: &CustomerId) -> Option<StoredLedger> {
        self.ledgers.lock().unwrap().get(customer_id).cloned()
    }

    pub fn put(&self, customer_id: CustomerId, ledger: StoredLedger) {
        self.ledgers.lock().unwrap().insert(customer_id, ledger);
    }
}

impl LedgerStore for MemoryLedgerStore {
    async fn fetch_ledger(&self, customer: &CustomerRecord) -> Result<Option<StoredLedger>, LedgerStoreError> {
        Ok(self.get(&customer.id))
    }

    async fn store_ledger(&self, customer: &CustomerRecord, ledger: &StoredLedger) -> Result<(), LedgerStoreError> {
        let rejected = self.rejections.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok();
        if rejected {
            return Err(LedgerStoreError::WriteRejected("breakdown: Value is invalid JSON".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.put(customer.id.clone(), ledger.clone());
        Ok(())
    }
}
