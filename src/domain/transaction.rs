//! Transaction domain entity.
//! A record of a balance mutation that has already been applied.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
            TransactionType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAW" => Ok(TransactionType::Withdraw),
            "TRANSFER" => Ok(TransactionType::Transfer),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}

/// Which accounts a transaction touched. Each variant carries exactly the
/// references its type allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit { receiver: Uuid },
    Withdraw { source: Uuid },
    Transfer { source: Uuid, receiver: Uuid },
}

/// Domain entity representing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    fn new(kind: TransactionKind, amount: BigDecimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            created_at: Utc::now(),
        }
    }

    pub fn deposit(receiver: Uuid, amount: BigDecimal) -> Self {
        Self::new(TransactionKind::Deposit { receiver }, amount)
    }

    pub fn withdraw(source: Uuid, amount: BigDecimal) -> Self {
        Self::new(TransactionKind::Withdraw { source }, amount)
    }

    pub fn transfer(source: Uuid, receiver: Uuid, amount: BigDecimal) -> Self {
        Self::new(TransactionKind::Transfer { source, receiver }, amount)
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self.kind {
            TransactionKind::Deposit { .. } => TransactionType::Deposit,
            TransactionKind::Withdraw { .. } => TransactionType::Withdraw,
            TransactionKind::Transfer { .. } => TransactionType::Transfer,
        }
    }

    pub fn source_account(&self) -> Option<Uuid> {
        match self.kind {
            TransactionKind::Deposit { .. } => None,
            TransactionKind::Withdraw { source } | TransactionKind::Transfer { source, .. } => {
                Some(source)
            }
        }
    }

    pub fn receiver_account(&self) -> Option<Uuid> {
        match self.kind {
            TransactionKind::Withdraw { .. } => None,
            TransactionKind::Deposit { receiver } | TransactionKind::Transfer { receiver, .. } => {
                Some(receiver)
            }
        }
    }

    pub fn touches(&self, account_id: Uuid) -> bool {
        self.source_account() == Some(account_id) || self.receiver_account() == Some(account_id)
    }

    /// Rebuilds a transaction from its stored columns, rejecting reference
    /// combinations that do not match the type.
    pub fn from_parts(
        id: Uuid,
        transaction_type: TransactionType,
        amount: BigDecimal,
        source: Option<Uuid>,
        receiver: Option<Uuid>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, String> {
        let kind = match (transaction_type, source, receiver) {
            (TransactionType::Deposit, None, Some(receiver)) => TransactionKind::Deposit { receiver },
            (TransactionType::Withdraw, Some(source), None) => TransactionKind::Withdraw { source },
            (TransactionType::Transfer, Some(source), Some(receiver)) => {
                TransactionKind::Transfer { source, receiver }
            }
            _ => {
                return Err(format!(
                    "transaction {} has account references inconsistent with type {}",
                    id, transaction_type
                ))
            }
        };

        Ok(Self {
            id,
            kind,
            amount,
            created_at,
        })
    }
}
