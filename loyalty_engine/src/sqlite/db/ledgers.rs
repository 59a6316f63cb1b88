use chrono::Utc;
use log::*;
use sqlx::SqliteConnection;

use crate::{
    ledger_types::{CustomerId, StoredLedger},
    sqlite::SqliteLedgerError,
};

pub async fn fetch_ledger(
    customer_id: &CustomerId,
    conn: &mut SqliteConnection,
) -> Result<Option<StoredLedger>, SqliteLedgerError> {
    let ledger = sqlx::query_as::<_, StoredLedger>("SELECT total, breakdown FROM ledgers WHERE customer_id = ?")
        .bind(customer_id.0.as_str())
        .fetch_optional(conn)
        .await?;
    trace!("🗃️ Ledger for {customer_id} {}", if ledger.is_some() { "found" } else { "not found" });
    Ok(ledger)
}

/// Inserts or replaces both fields of a customer's ledger in a single statement.
pub async fn upsert_ledger(
    customer_id: &CustomerId,
    ledger: &StoredLedger,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteLedgerError> {
    let now = Utc::now();
    sqlx::query(
        r#"INSERT INTO ledgers (customer_id, total, breakdown, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        ON CONFLICT (customer_id) DO UPDATE SET
            total = excluded.total,
            breakdown = excluded.breakdown,
            updated_at = excluded.updated_at"#,
    )
    .bind(customer_id.0.as_str())
    .bind(ledger.total.as_str())
    .bind(ledger.breakdown.as_str())
    .bind(now)
    .execute(conn)
    .await?;
    debug!("🗃️ Ledger for {customer_id} saved. Total {}", ledger.total);
    Ok(())
}

pub async fn count_ledgers(conn: &mut SqliteConnection) -> Result<i64, SqliteLedgerError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ledgers").fetch_one(conn).await?;
    Ok(count)
}
