//! Storage ports. The engine and services only see these traits; adapters
//! under `crate::adapters` provide Postgres and in-memory implementations.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Account, Transaction};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(db.message().to_string())
            }
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Account Store.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_by_number(&self, number: i64) -> RepositoryResult<Option<Account>>;
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Account>>;
    async fn list_all(&self) -> RepositoryResult<Vec<Account>>;
    /// Insert-or-update keyed by id. Fails with `Conflict` when the number
    /// already belongs to a different account.
    async fn save(&self, account: &Account) -> RepositoryResult<Account>;
}

/// Read side of the Transaction Store. Writes only happen through a
/// [`LedgerSession`].
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Transaction>>;
    /// Newest first.
    async fn list_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>>;
}

/// Opens units of work spanning both stores.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn begin(&self) -> RepositoryResult<Box<dyn LedgerSession>>;
}

/// One unit of work. Accounts read here stay locked until the session ends.
/// Nothing written through a session is visible to others until `commit`;
/// dropping it uncommitted discards every write.
#[async_trait]
pub trait LedgerSession: Send {
    async fn lock_account_by_number(&mut self, number: i64) -> RepositoryResult<Option<Account>>;
    async fn save_account(&mut self, account: &Account) -> RepositoryResult<Account>;
    async fn save_transaction(&mut self, tx: &Transaction) -> RepositoryResult<Transaction>;
    async fn commit(self: Box<Self>) -> RepositoryResult<()>;
}
