//! Domain entities, independent of storage and transport.

pub mod account;
pub mod transaction;

pub use account::{Account, AccountChanges, NewAccount};
pub use transaction::{Transaction, TransactionKind, TransactionType};
