//! Postgres implementation of the storage ports.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::domain::{Account, Transaction, TransactionType};
use crate::ports::{
    AccountRepository, Ledger, LedgerSession, RepositoryError, RepositoryResult,
    TransactionRepository,
};

const ACCOUNT_COLUMNS: &str = "id, number, name, balance, special_limit";
const TRANSACTION_COLUMNS: &str =
    "id, kind, amount, source_account_id, receiver_account_id, created_at";

/// Postgres-backed account and transaction store.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountRepository for PostgresStore {
    async fn get_by_number(&self, number: i64) -> RepositoryResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE number = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_domain))
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_domain))
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts ORDER BY number",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AccountRow::into_domain).collect())
    }

    async fn save(&self, account: &Account) -> RepositoryResult<Account> {
        // Balance is only written on insert; existing balances move through
        // a ledger session.
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (id, number, name, balance, special_limit)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                number = EXCLUDED.number,
                name = EXCLUDED.name,
                special_limit = EXCLUDED.special_limit,
                updated_at = NOW()
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(account.id)
        .bind(account.number)
        .bind(&account.name)
        .bind(&account.balance)
        .bind(&account.special_limit)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_domain())
    }
}

#[async_trait]
impl TransactionRepository for PostgresStore {
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {} FROM transactions WHERE id = $1",
            TRANSACTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn list_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {} FROM transactions
            WHERE source_account_id = $1 OR receiver_account_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }
}

#[async_trait]
impl Ledger for PostgresStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn LedgerSession>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresSession { tx }))
    }
}

/// A ledger session backed by one database transaction. Dropping it without
/// commit rolls the transaction back.
struct PostgresSession {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl LedgerSession for PostgresSession {
    async fn lock_account_by_number(&mut self, number: i64) -> RepositoryResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE number = $1 FOR UPDATE",
            ACCOUNT_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(AccountRow::into_domain))
    }

    async fn save_account(&mut self, account: &Account) -> RepositoryResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET number = $2, name = $3, balance = $4, special_limit = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(account.id)
        .bind(account.number)
        .bind(&account.name)
        .bind(&account.balance)
        .bind(&account.special_limit)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(AccountRow::into_domain)
            .ok_or_else(|| RepositoryError::NotFound(account.id.to_string()))
    }

    async fn save_transaction(&mut self, tx: &Transaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (
                id, kind, amount, source_account_id, receiver_account_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(tx.id)
        .bind(tx.transaction_type().as_str())
        .bind(&tx.amount)
        .bind(tx.source_account())
        .bind(tx.receiver_account())
        .bind(tx.created_at)
        .fetch_one(&mut *self.tx)
        .await?;

        row.into_domain()
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        let session = *self;
        session.tx.commit().await?;
        Ok(())
    }
}

/// Internal row types for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    number: i64,
    name: String,
    balance: BigDecimal,
    special_limit: BigDecimal,
}

impl AccountRow {
    fn into_domain(self) -> Account {
        Account {
            id: self.id,
            number: self.number,
            name: self.name,
            balance: self.balance,
            special_limit: self.special_limit,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    kind: String,
    amount: BigDecimal,
    source_account_id: Option<Uuid>,
    receiver_account_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let transaction_type = self
            .kind
            .parse::<TransactionType>()
            .map_err(RepositoryError::Database)?;

        Transaction::from_parts(
            self.id,
            transaction_type,
            self.amount,
            self.source_account_id,
            self.receiver_account_id,
            self.created_at,
        )
        .map_err(RepositoryError::Database)
    }
}
