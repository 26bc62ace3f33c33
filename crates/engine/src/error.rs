//! Engine-level error type and coarse classification

use corebank_accounts::AccountError;
use corebank_core::{AccountId, MoneyError};
use corebank_loans::LoanError;
use strum_macros::Display;
use thiserror::Error;

/// Any failure an engine operation can surface to a caller.
///
/// Domain errors from the account store and the loan book pass through
/// transparently; the engine adds only the failures it detects itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    #[error("Source and destination are the same account ({0})")]
    SameAccount(AccountId),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Loan(#[from] LoanError),

    /// An invariant the engine maintains was violated mid-operation. The
    /// offending operation has been rolled back.
    #[error("Internal invariant violated: {0}")]
    Internal(String),
}

/// Coarse failure classes, for callers that map errors onto response
/// codes or exit statuses without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    InsufficientFunds,
    StateConflict,
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_) | Self::SameAccount(_) => ErrorKind::InvalidInput,
            Self::Account(err) => match err {
                AccountError::AccountNotFound(_) | AccountError::CardNotFound(_) => {
                    ErrorKind::NotFound
                }
                AccountError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
                AccountError::AccountFrozen(_)
                | AccountError::AccountClosed(_)
                | AccountError::CardBlocked(_)
                | AccountError::SpendLimitExceeded { .. } => ErrorKind::StateConflict,
                AccountError::BalanceOverflow(_) => ErrorKind::Internal,
            },
            Self::Loan(err) => match err {
                LoanError::InvalidTerms { .. } => ErrorKind::InvalidInput,
                LoanError::LoanNotFound(_) => ErrorKind::NotFound,
                LoanError::LoanClosed(_) => ErrorKind::StateConflict,
            },
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
