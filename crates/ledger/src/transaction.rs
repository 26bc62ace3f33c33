//! Ledger transaction records.

use chrono::{DateTime, Utc};
use corebank_core::{AccountId, Amount, Balance, TransactionId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Transfer,
    CardPayment,
    LoanDisbursement,
    LoanRepayment,
}

/// One immutable ledger entry.
///
/// `source` is absent for money entering the system (deposits, loan
/// disbursements); `destination` is absent for money leaving it (card
/// payments settle with the acquirer, repayments with the lender). The
/// balance snapshots record each touched account's balance immediately
/// after the mutation, for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub source: Option<AccountId>,
    pub destination: Option<AccountId>,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    pub source_balance: Option<Balance>,
    pub destination_balance: Option<Balance>,
}

/// Everything the ledger needs to mint a `Transaction` except the id and
/// timestamp, which the append path assigns. The per-kind constructors keep
/// the leg layout right by construction.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub(crate) kind: TransactionKind,
    pub(crate) source: Option<AccountId>,
    pub(crate) destination: Option<AccountId>,
    pub(crate) amount: Amount,
    pub(crate) source_balance: Option<Balance>,
    pub(crate) destination_balance: Option<Balance>,
}

impl TransactionDraft {
    pub fn deposit(destination: AccountId, amount: Amount, balance_after: Balance) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            source: None,
            destination: Some(destination),
            amount,
            source_balance: None,
            destination_balance: Some(balance_after),
        }
    }

    pub fn transfer(
        source: AccountId,
        destination: AccountId,
        amount: Amount,
        source_after: Balance,
        destination_after: Balance,
    ) -> Self {
        Self {
            kind: TransactionKind::Transfer,
            source: Some(source),
            destination: Some(destination),
            amount,
            source_balance: Some(source_after),
            destination_balance: Some(destination_after),
        }
    }

    pub fn card_payment(source: AccountId, amount: Amount, balance_after: Balance) -> Self {
        Self {
            kind: TransactionKind::CardPayment,
            source: Some(source),
            destination: None,
            amount,
            source_balance: Some(balance_after),
            destination_balance: None,
        }
    }

    pub fn loan_disbursement(destination: AccountId, amount: Amount, balance_after: Balance) -> Self {
        Self {
            kind: TransactionKind::LoanDisbursement,
            source: None,
            destination: Some(destination),
            amount,
            source_balance: None,
            destination_balance: Some(balance_after),
        }
    }

    pub fn loan_repayment(source: AccountId, amount: Amount, balance_after: Balance) -> Self {
        Self {
            kind: TransactionKind::LoanRepayment,
            source: Some(source),
            destination: None,
            amount,
            source_balance: Some(balance_after),
            destination_balance: None,
        }
    }
}
