//! In-memory implementation of the storage ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::{Account, Transaction};
use crate::ports::{
    AccountRepository, Ledger, LedgerSession, RepositoryError, RepositoryResult,
    TransactionRepository,
};

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    transactions: Vec<Transaction>,
}

impl State {
    fn number_taken(&self, account: &Account) -> bool {
        self.accounts
            .values()
            .any(|other| other.number == account.number && other.id != account.id)
    }
}

/// A thread-safe in-memory store for accounts and transactions.
///
/// A ledger session holds the store lock for its whole lifetime, so sessions
/// run one at a time. Writes are staged and only reach the shared state on
/// commit.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    fail_transaction_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent transaction write fail with a database error.
    pub fn fail_transaction_writes(&self, fail: bool) {
        self.fail_transaction_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn get_by_number(&self, number: i64) -> RepositoryResult<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state.accounts.values().find(|a| a.number == number).cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Account>> {
        let state = self.state.lock().await;
        let mut accounts: Vec<Account> = state.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.number);
        Ok(accounts)
    }

    async fn save(&self, account: &Account) -> RepositoryResult<Account> {
        let mut state = self.state.lock().await;
        if state.number_taken(account) {
            return Err(RepositoryError::Conflict(format!(
                "account number {} already exists",
                account.number
            )));
        }

        let mut stored = account.clone();
        if let Some(existing) = state.accounts.get(&account.id) {
            stored.balance = existing.balance.clone();
        }
        state.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl TransactionRepository for InMemoryStore {
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Transaction>> {
        let state = self.state.lock().await;
        Ok(state.transactions.iter().find(|t| t.id == id).cloned())
    }

    async fn list_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| t.touches(account_id))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Ledger for InMemoryStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn LedgerSession>> {
        let state = self.state.clone().lock_owned().await;
        Ok(Box::new(InMemorySession {
            state,
            staged_accounts: HashMap::new(),
            staged_transactions: Vec::new(),
            fail_transaction_writes: self.fail_transaction_writes.load(Ordering::SeqCst),
        }))
    }
}

struct InMemorySession {
    state: OwnedMutexGuard<State>,
    staged_accounts: HashMap<Uuid, Account>,
    staged_transactions: Vec<Transaction>,
    fail_transaction_writes: bool,
}

#[async_trait]
impl LedgerSession for InMemorySession {
    async fn lock_account_by_number(&mut self, number: i64) -> RepositoryResult<Option<Account>> {
        if let Some(staged) = self.staged_accounts.values().find(|a| a.number == number) {
            return Ok(Some(staged.clone()));
        }

        Ok(self
            .state
            .accounts
            .values()
            .find(|a| a.number == number && !self.staged_accounts.contains_key(&a.id))
            .cloned())
    }

    async fn save_account(&mut self, account: &Account) -> RepositoryResult<Account> {
        let taken = self.state.number_taken(account)
            || self
                .staged_accounts
                .values()
                .any(|other| other.number == account.number && other.id != account.id);
        if taken {
            return Err(RepositoryError::Conflict(format!(
                "account number {} already exists",
                account.number
            )));
        }

        self.staged_accounts.insert(account.id, account.clone());
        Ok(account.clone())
    }

    async fn save_transaction(&mut self, tx: &Transaction) -> RepositoryResult<Transaction> {
        if self.fail_transaction_writes {
            return Err(RepositoryError::Database(
                "transaction store unavailable".to_string(),
            ));
        }

        self.staged_transactions.push(tx.clone());
        Ok(tx.clone())
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        let InMemorySession {
            mut state,
            staged_accounts,
            staged_transactions,
            ..
        } = *self;

        state.accounts.extend(staged_accounts);
        state.transactions.extend(staged_transactions);
        Ok(())
    }
}
