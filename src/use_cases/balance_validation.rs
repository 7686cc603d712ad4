use bigdecimal::BigDecimal;

use crate::domain::Account;
use crate::use_cases::TransactionError;

/// Signature of the funds check the engine runs before every debit.
pub type FundsCheck = fn(&Account, &BigDecimal) -> Result<(), TransactionError>;

/// Passes when `amount` fits within the account's available balance.
/// Spending exactly the available balance is allowed.
pub fn check_sufficient_funds(account: &Account, amount: &BigDecimal) -> Result<(), TransactionError> {
    let available = account.available_balance();
    if &available < amount {
        return Err(TransactionError::InsufficientFunds {
            account_number: account.number,
            available,
            requested: amount.clone(),
        });
    }

    Ok(())
}
