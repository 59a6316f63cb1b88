use thiserror::Error;

use crate::traits::LedgerStoreError;

#[derive(Debug, Error)]
pub enum SqliteLedgerError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl From<SqliteLedgerError> for LedgerStoreError {
    fn from(e: SqliteLedgerError) -> Self {
        match e {
            SqliteLedgerError::DatabaseError(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
                LedgerStoreError::Unavailable(e.to_string())
            },
            e => LedgerStoreError::Backend(e.to_string()),
        }
    }
}
