use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{ledgers, new_pool};
use crate::{
    ledger_types::{CustomerRecord, StoredLedger},
    sqlite::SqliteLedgerError,
    traits::{LedgerStore, LedgerStoreError},
};

#[derive(Clone)]
pub struct SqliteLedgerStore {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteLedgerStore ({})", self.url)
    }
}

impl SqliteLedgerStore {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteLedgerError> {
        trace!("🗃️ Creating new ledger store connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub async fn migrate(&self) -> Result<(), SqliteLedgerError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Ledger store migrations complete");
        Ok(())
    }

    pub async fn ledger_count(&self) -> Result<i64, SqliteLedgerError> {
        let mut conn = self.pool.acquire().await?;
        ledgers::count_ledgers(&mut conn).await
    }

    pub async fn close(&mut self) -> Result<(), SqliteLedgerError> {
        self.pool.close().await;
        Ok(())
    }
}

impl LedgerStore for SqliteLedgerStore {
    async fn fetch_ledger(&self, customer: &CustomerRecord) -> Result<Option<StoredLedger>, LedgerStoreError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteLedgerError::from)?;
        Ok(ledgers::fetch_ledger(&customer.id, &mut conn).await?)
    }

    async fn store_ledger(&self, customer: &CustomerRecord, ledger: &StoredLedger) -> Result<(), LedgerStoreError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteLedgerError::from)?;
        Ok(ledgers::upsert_ledger(&customer.id, ledger, &mut conn).await?)
    }
}
