//! Low-level SQLite functions. Each takes a `&mut SqliteConnection`, so callers can use a pooled connection or a
//! transaction without any other changes.
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod ledgers;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    SqlitePoolOptions::new().max_connections(max_connections).connect(url).await
}
