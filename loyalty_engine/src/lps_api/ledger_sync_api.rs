use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    events::{EventProducers, LedgerInconsistencyEvent, PointsAwardedEvent, PointsRevertedEvent},
    ledger_types::{CustomerRecord, LedgerEntry, LedgerState, SocialAction},
    lps_api::{
        errors::SyncError,
        sync_objects::{SocialAward, SyncConfig, SyncResult},
        CustomerLocks,
    },
    reconciliation::ReconciliationEngine,
    social,
    traits::{LedgerStore, OrderSource},
};

/// `LedgerSyncApi` brings a customer's ledger up to date with their orders.
///
/// Every read-reconcile-write cycle for a customer runs under that customer's lock, so concurrent syncs for the same
/// customer cannot both append the same award. Clones share the lock table, so build the API once and share it
/// between workers.
#[derive(Clone)]
pub struct LedgerSyncApi<O, S> {
    orders: O,
    store: S,
    engine: ReconciliationEngine,
    config: SyncConfig,
    locks: CustomerLocks,
    producers: EventProducers,
}

impl<O, S> Debug for LedgerSyncApi<O, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LedgerSyncApi ({:?})", self.config)
    }
}

impl<O, S> LedgerSyncApi<O, S> {
    pub fn new(orders: O, store: S, config: SyncConfig, producers: EventProducers) -> Self {
        let engine = ReconciliationEngine::new(config.rules);
        Self { orders, store, engine, config, locks: CustomerLocks::new(), producers }
    }

    pub fn order_source(&self) -> &O {
        &self.orders
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

impl<O, S> LedgerSyncApi<O, S>
where
    O: OrderSource,
    S: LedgerStore,
{
    /// Runs a full sync cycle for the customer with the given email.
    ///
    /// Transient upstream failures restart the whole cycle, up to `max_attempts` times. This is safe because a cycle
    /// over unchanged data appends nothing.
    pub async fn sync_customer(&self, email: &str) -> Result<SyncResult, SyncError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.sync_once(email).await {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!("🔄️ Sync attempt {attempt}/{max_attempts} for {email} failed. {e}. Retrying.");
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                },
                Err(e) => {
                    warn!("🔄️ Sync for {email} failed after {attempt} attempt(s). {e}");
                    return Err(e);
                },
                Ok(result) => return Ok(result),
            }
        }
    }

    async fn sync_once(&self, email: &str) -> Result<SyncResult, SyncError> {
        let customer = self.resolve_customer(email).await?;
        let _guard = self.locks.acquire(&customer.id).await;
        trace!("🔄️ Acquired ledger lock for {}", customer.id);
        let current = self.read_ledger(&customer).await?;
        let orders = self.orders.fetch_orders_for_customer(&customer).await?;
        debug!("🔄️ Reconciling {} orders against {} ledger entries for {}", orders.len(), current.len(), customer.id);
        let reconciliation = self.engine.reconcile(&current, &orders)?;
        let stored = reconciliation.needs_write();
        if stored {
            let encoded = reconciliation.ledger.to_stored()?;
            self.store.store_ledger(&customer, &encoded).await?;
            info!(
                "🔄️ Ledger for {} updated. {} new entries, net change {}, total {}",
                customer.id,
                reconciliation.new_entries.len(),
                reconciliation.net_change,
                reconciliation.ledger.total()
            );
        } else {
            debug!("🔄️ Ledger for {} is up to date", customer.id);
        }
        if !reconciliation.inconsistencies.is_empty() {
            let event = LedgerInconsistencyEvent {
                customer_id: customer.id.clone(),
                inconsistencies: reconciliation.inconsistencies.clone(),
            };
            self.producers.publish_inconsistency(event).await;
        }
        self.publish_entries(&customer, &reconciliation.new_entries).await;
        Ok(SyncResult {
            customer_id: customer.id,
            net_change: reconciliation.net_change,
            total: reconciliation.ledger.total(),
            new_entries: reconciliation.new_entries,
            breakdown: reconciliation.ledger.breakdown().to_vec(),
            inconsistencies: reconciliation.inconsistencies,
            stored,
        })
    }

    /// Returns the customer's ledger as it is stored. Customers without a ledger get an empty one.
    pub async fn fetch_points(&self, email: &str) -> Result<LedgerState, SyncError> {
        let customer = self.resolve_customer(email).await?;
        self.read_ledger(&customer).await
    }

    /// Grants the one-off reward for a social action.
    pub async fn award_social_action(&self, email: &str, action: SocialAction) -> Result<SocialAward, SyncError> {
        let customer = self.resolve_customer(email).await?;
        let _guard = self.locks.acquire(&customer.id).await;
        let mut ledger = self.read_ledger(&customer).await?;
        let entry = social::award_social_action(&mut ledger, action, Utc::now())?;
        let encoded = ledger.to_stored()?;
        self.store.store_ledger(&customer, &encoded).await?;
        info!("🎁️ {} awarded {} for '{action}'. New total {}", customer.id, entry.points, ledger.total());
        self.publish_entries(&customer, std::slice::from_ref(&entry)).await;
        Ok(SocialAward { customer_id: customer.id, entry, total: ledger.total() })
    }

    async fn resolve_customer(&self, email: &str) -> Result<CustomerRecord, SyncError> {
        self.orders.fetch_customer_by_email(email).await?.ok_or_else(|| {
            info!("🔄️ No customer found for {email}");
            SyncError::CustomerNotFound(email.to_string())
        })
    }

    async fn read_ledger(&self, customer: &CustomerRecord) -> Result<LedgerState, SyncError> {
        match self.store.fetch_ledger(customer).await? {
            Some(stored) => Ok(stored.decode()?),
            None => {
                debug!("🔄️ Customer {} has no ledger yet. Starting with an empty one.", customer.id);
                Ok(LedgerState::new())
            },
        }
    }

    async fn publish_entries(&self, customer: &CustomerRecord, entries: &[LedgerEntry]) {
        for entry in entries {
            if entry.points.is_positive() {
                let event = PointsAwardedEvent { customer_id: customer.id.clone(), entry: entry.clone() };
                self.producers.publish_points_awarded(event).await;
            } else {
                let event = PointsRevertedEvent { customer_id: customer.id.clone(), entry: entry.clone() };
                self.producers.publish_points_reverted(event).await;
            }
        }
    }
}
