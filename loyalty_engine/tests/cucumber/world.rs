use cucumber::World;
use log::*;
use loyalty_engine::{
    ledger_types::{CustomerRecord, LedgerState},
    EventProducers,
    LedgerStore,
    LedgerSyncApi,
    SocialAward,
    SqliteLedgerStore,
    SyncConfig,
    SyncError,
    SyncResult,
};

use crate::support::{order_book::MemoryOrderSource, prepare_env::prepare_test_env};

#[derive(Default, Debug, World)]
pub struct LedgerWorld {
    pub system: Option<LoyaltySystem>,
    pub last_sync: Option<Result<SyncResult, SyncError>>,
    pub last_award: Option<Result<SocialAward, SyncError>>,
}

#[derive(Debug)]
pub struct LoyaltySystem {
    pub db_path: String,
    pub orders: MemoryOrderSource,
    pub api: LedgerSyncApi<MemoryOrderSource, SqliteLedgerStore>,
}

impl LoyaltySystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let store = SqliteLedgerStore::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let orders = MemoryOrderSource::default();
        let api = LedgerSyncApi::new(orders.clone(), store, SyncConfig::default(), EventProducers::default());
        Self { db_path: url, orders, api }
    }
}

impl LedgerWorld {
    pub fn system(&self) -> &LoyaltySystem {
        self.system.as_ref().expect("Loyalty system not initialised")
    }

    pub fn api(&self) -> &LedgerSyncApi<MemoryOrderSource, SqliteLedgerStore> {
        &self.system().api
    }

    pub fn orders(&self) -> &MemoryOrderSource {
        &self.system().orders
    }

    pub fn customer(&self, email: &str) -> CustomerRecord {
        self.orders().customer(email).unwrap_or_else(|| panic!("No customer with email {email}"))
    }

    /// Reads the ledger straight from the store, bypassing the API.
    pub async fn stored_ledger(&self, email: &str) -> Option<LedgerState> {
        let customer = self.customer(email);
        let stored = self.api().store().fetch_ledger(&customer).await.expect("Error fetching ledger");
        stored.map(|s| s.decode().expect("Stored ledger is malformed"))
    }

    pub fn last_sync(&self) -> &SyncResult {
        match self.last_sync.as_ref().expect("No sync has run") {
            Ok(result) => result,
            Err(e) => panic!("Last sync failed: {e}"),
        }
    }
}
