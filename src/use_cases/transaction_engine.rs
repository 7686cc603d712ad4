//! Deposit, withdraw and transfer. Each operation runs in a single ledger
//! session: all balance changes and the transaction record commit together,
//! or the session is dropped and nothing is written.

use bigdecimal::BigDecimal;
use std::sync::Arc;

use crate::domain::Transaction;
use crate::ports::Ledger;
use crate::use_cases::{resolve_account, FundsCheck, TransactionError};
use crate::validation::validate_positive_amount;

#[derive(Debug, Clone)]
pub struct DepositInput {
    pub receiver_account_number: i64,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct WithdrawInput {
    pub source_account_number: i64,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct TransferInput {
    pub source_account_number: i64,
    pub receiver_account_number: i64,
    pub amount: BigDecimal,
}

#[derive(Clone)]
pub struct TransactionEngine {
    ledger: Arc<dyn Ledger>,
    check_funds: FundsCheck,
}

impl TransactionEngine {
    pub fn new(ledger: Arc<dyn Ledger>, check_funds: FundsCheck) -> Self {
        Self { ledger, check_funds }
    }

    pub async fn deposit(&self, input: DepositInput) -> Result<Transaction, TransactionError> {
        ensure_valid_amount(&input.amount)?;

        let mut session = self.ledger.begin().await?;
        let mut receiver = resolve_account(session.as_mut(), input.receiver_account_number)
            .await
            .map_err(log_rejection)?;

        receiver.credit(&input.amount);
        session.save_account(&receiver).await?;
        let recorded = session
            .save_transaction(&Transaction::deposit(receiver.id, input.amount))
            .await?;
        session.commit().await?;

        tracing::info!(
            transaction_id = %recorded.id,
            receiver = receiver.number,
            amount = %recorded.amount,
            "Deposit recorded"
        );
        Ok(recorded)
    }

    pub async fn withdraw(&self, input: WithdrawInput) -> Result<Transaction, TransactionError> {
        ensure_valid_amount(&input.amount)?;

        let mut session = self.ledger.begin().await?;
        let mut source = resolve_account(session.as_mut(), input.source_account_number)
            .await
            .map_err(log_rejection)?;
        (self.check_funds)(&source, &input.amount).map_err(log_rejection)?;

        source.debit(&input.amount);
        session.save_account(&source).await?;
        let recorded = session
            .save_transaction(&Transaction::withdraw(source.id, input.amount))
            .await?;
        session.commit().await?;

        tracing::info!(
            transaction_id = %recorded.id,
            source = source.number,
            amount = %recorded.amount,
            "Withdrawal recorded"
        );
        Ok(recorded)
    }

    pub async fn transfer(&self, input: TransferInput) -> Result<Transaction, TransactionError> {
        ensure_valid_amount(&input.amount)?;
        if input.source_account_number == input.receiver_account_number {
            return Err(TransactionError::InvalidInput(
                "source and receiver accounts must differ".to_string(),
            ));
        }

        let mut session = self.ledger.begin().await?;

        // Lock in ascending number order so two opposite transfers cannot
        // wait on each other.
        let (mut source, mut receiver) =
            if input.source_account_number < input.receiver_account_number {
                let source = resolve_account(session.as_mut(), input.source_account_number).await;
                let source = source.map_err(log_rejection)?;
                let receiver = resolve_account(session.as_mut(), input.receiver_account_number).await;
                (source, receiver.map_err(log_rejection)?)
            } else {
                let receiver = resolve_account(session.as_mut(), input.receiver_account_number).await;
                let receiver = receiver.map_err(log_rejection)?;
                let source = resolve_account(session.as_mut(), input.source_account_number).await;
                (source.map_err(log_rejection)?, receiver)
            };
        (self.check_funds)(&source, &input.amount).map_err(log_rejection)?;

        source.debit(&input.amount);
        receiver.credit(&input.amount);
        session.save_account(&source).await?;
        session.save_account(&receiver).await?;
        let recorded = session
            .save_transaction(&Transaction::transfer(source.id, receiver.id, input.amount))
            .await?;
        session.commit().await?;

        tracing::info!(
            transaction_id = %recorded.id,
            source = source.number,
            receiver = receiver.number,
            amount = %recorded.amount,
            "Transfer recorded"
        );
        Ok(recorded)
    }
}

fn ensure_valid_amount(amount: &BigDecimal) -> Result<(), TransactionError> {
    validate_positive_amount(amount).map_err(|e| TransactionError::InvalidInput(e.to_string()))
}

fn log_rejection(err: TransactionError) -> TransactionError {
    match &err {
        TransactionError::InsufficientFunds {
            account_number,
            available,
            requested,
        } => tracing::warn!(
            account = account_number,
            available = %available,
            requested = %requested,
            "Transaction rejected: insufficient funds"
        ),
        other => tracing::warn!(error = %other, "Transaction rejected"),
    }
    err
}
