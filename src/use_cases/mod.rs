//! Transaction processing: account resolution, funds validation and the
//! engine that applies deposits, withdrawals and transfers.

pub mod balance_validation;
pub mod error;
pub mod resolve_account;
pub mod transaction_engine;

pub use balance_validation::{check_sufficient_funds, FundsCheck};
pub use error::TransactionError;
pub use resolve_account::resolve_account;
pub use transaction_engine::{DepositInput, TransactionEngine, TransferInput, WithdrawInput};
