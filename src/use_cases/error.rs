use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::ports::RepositoryError;

/// Failures of a money-movement operation. `NotFound` and
/// `InsufficientFunds` are the caller's problem; `Storage` means the system
/// could not record the operation.
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("account {0} not found")]
    NotFound(i64),

    #[error("insufficient funds in account {account_number}")]
    InsufficientFunds {
        account_number: i64,
        available: BigDecimal,
        requested: BigDecimal,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

impl TransactionError {
    pub fn is_domain(&self) -> bool {
        !matches!(self, TransactionError::Storage(_))
    }
}
