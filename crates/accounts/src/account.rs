//! Account records and status lifecycle.

use chrono::{DateTime, Utc};
use corebank_core::{AccountId, Balance, UserId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::AccountError;

/// Lifecycle of an account.
///
/// `Frozen` blocks every balance mutation (credits included) but is
/// reversible; `Closed` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Frozen,
    Closed,
}

/// A balance-holding account.
///
/// # Invariant
/// `balance` is >= 0 after every committed operation; `apply_delta` is the
/// only mutation path and refuses anything that would break that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: UserId,
    pub balance: Balance,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub(crate) fn new(id: AccountId, owner: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            balance: Balance::ZERO,
            status: AccountStatus::Active,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Refuse the operation unless the account is active.
    pub fn ensure_active(&self) -> Result<(), AccountError> {
        match self.status {
            AccountStatus::Active => Ok(()),
            AccountStatus::Frozen => Err(AccountError::AccountFrozen(self.id)),
            AccountStatus::Closed => Err(AccountError::AccountClosed(self.id)),
        }
    }

    /// Apply a signed balance change and return the new balance.
    ///
    /// Positive `delta` credits, negative debits. Fails with
    /// `InsufficientFunds` if a debit would go below zero, `BalanceOverflow`
    /// if a credit would leave `i64` range, and the status errors otherwise.
    /// Callers must hold this account's lock.
    pub fn apply_delta(&mut self, delta: i64) -> Result<Balance, AccountError> {
        self.ensure_active()?;
        let current = self.balance.value();
        let next = current
            .checked_add(delta)
            .ok_or(AccountError::BalanceOverflow(self.id))?;
        if next < 0 {
            return Err(AccountError::InsufficientFunds {
                account: self.id,
                requested: delta.unsigned_abs(),
                available: current,
            });
        }
        self.balance = Balance::new_unchecked(next);
        Ok(self.balance)
    }
}
