//! Account and card operation errors.

use corebank_core::{AccountId, CardId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    #[error("Account {0} is frozen")]
    AccountFrozen(AccountId),

    #[error("Account {0} is closed")]
    AccountClosed(AccountId),

    #[error("Insufficient funds on account {account}: requested {requested}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        requested: u64,
        available: i64,
    },

    /// A credit pushed the balance past `i64::MAX`. Callers treat this as an
    /// internal invariant violation, not a user error.
    #[error("Balance overflow on account {0}")]
    BalanceOverflow(AccountId),

    #[error("Card {0} not found")]
    CardNotFound(CardId),

    #[error("Card {0} is blocked")]
    CardBlocked(CardId),

    #[error("Card {card} spend limit {limit} exceeded by requested {requested}")]
    SpendLimitExceeded {
        card: CardId,
        limit: i64,
        requested: i64,
    },
}
