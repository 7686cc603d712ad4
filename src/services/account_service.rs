use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Account, AccountChanges, NewAccount};
use crate::ports::{AccountRepository, RepositoryError};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("account {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for AccountError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => AccountError::Conflict(msg),
            other => AccountError::Storage(other),
        }
    }
}

/// Account lifecycle: opening and editing accounts. Balances are never
/// touched here.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn get_by_number(&self, number: i64) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.get_by_number(number).await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.get_by_id(id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.accounts.list_all().await?)
    }

    /// Opens an account with a zero balance.
    pub async fn create(&self, new: NewAccount) -> Result<Account, AccountError> {
        let account = self.accounts.save(&Account::open(new)).await?;
        tracing::info!(account_id = %account.id, number = account.number, "Account created");
        Ok(account)
    }

    pub async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<Account, AccountError> {
        let mut account = self
            .accounts
            .get_by_id(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        account.apply(changes);
        let account = self.accounts.save(&account).await?;
        tracing::info!(account_id = %account.id, number = account.number, "Account updated");
        Ok(account)
    }
}
