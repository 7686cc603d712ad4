//! Account resolution: public account number to locked account row.

use crate::domain::Account;
use crate::ports::LedgerSession;
use crate::use_cases::TransactionError;

/// Looks up `number` inside the session, failing fast when it does not exist.
pub async fn resolve_account(
    session: &mut dyn LedgerSession,
    number: i64,
) -> Result<Account, TransactionError> {
    session
        .lock_account_by_number(number)
        .await?
        .ok_or(TransactionError::NotFound(number))
}
