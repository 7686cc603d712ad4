//! Account domain entity.
//! Framework-agnostic representation of a bank account.

use bigdecimal::BigDecimal;
use serde::Serialize;
use uuid::Uuid;

/// Domain entity representing an account.
///
/// `balance` may only drop below zero as the result of a debit, and never
/// further than `-special_limit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub number: i64,
    pub name: String,
    pub balance: BigDecimal,
    pub special_limit: BigDecimal,
}

/// Fields a caller supplies when opening an account. There is no balance:
/// every account opens at zero.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub number: i64,
    pub special_limit: BigDecimal,
}

/// Mutable fields of an existing account. Balance is not one of them.
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub name: String,
    pub number: i64,
    pub special_limit: BigDecimal,
}

impl Account {
    pub fn open(new: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: new.number,
            name: new.name,
            balance: BigDecimal::from(0),
            special_limit: new.special_limit,
        }
    }

    /// Balance plus overdraft allowance; the ceiling for any debit.
    pub fn available_balance(&self) -> BigDecimal {
        &self.balance + &self.special_limit
    }

    pub fn credit(&mut self, amount: &BigDecimal) {
        self.balance = &self.balance + amount;
    }

    /// Callers check funds first; this only applies the mutation.
    pub fn debit(&mut self, amount: &BigDecimal) {
        self.balance = &self.balance - amount;
    }

    pub fn apply(&mut self, changes: AccountChanges) {
        self.name = changes.name;
        self.number = changes.number;
        self.special_limit = changes.special_limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn account(balance: &str, limit: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            number: 1,
            name: "Alice".to_string(),
            balance: dec(balance),
            special_limit: dec(limit),
        }
    }

    #[test]
    fn open_starts_at_zero() {
        let account = Account::open(NewAccount {
            name: "Alice".to_string(),
            number: 42,
            special_limit: dec("250"),
        });

        assert_eq!(account.balance, BigDecimal::from(0));
        assert_eq!(account.number, 42);
        assert_eq!(account.special_limit, dec("250"));
    }

    #[test]
    fn available_balance_includes_special_limit() {
        assert_eq!(account("100.50", "50").available_balance(), dec("150.50"));
        assert_eq!(account("-20", "50").available_balance(), dec("30"));
    }

    #[test]
    fn credit_and_debit_move_balance() {
        let mut account = account("100", "0");
        account.credit(&dec("25.25"));
        assert_eq!(account.balance, dec("125.25"));

        account.debit(&dec("200"));
        assert_eq!(account.balance, dec("-74.75"));
    }

    #[test]
    fn apply_leaves_balance_alone() {
        let mut account = account("300", "0");
        account.apply(AccountChanges {
            name: "Bob".to_string(),
            number: 7,
            special_limit: dec("10"),
        });

        assert_eq!(account.name, "Bob");
        assert_eq!(account.number, 7);
        assert_eq!(account.special_limit, dec("10"));
        assert_eq!(account.balance, dec("300"));
    }
}
