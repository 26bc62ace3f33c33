//! Corebank Engine - the in-process banking facade
//!
//! Wires the account store, transaction ledger and loan book together and
//! exposes every operation of the bank as a method on [`BankEngine`].
//! The engine is fully synchronous; callers drive it from as many threads
//! as they like and rely on per-account locking for isolation.
//!
//! # Key Types
//! - `BankEngine`: the facade owning all state
//! - `TransferProcessor`: deposits, transfers and loan money legs
//! - `CardAuthorizer`: card payment authorization
//! - `LoanDesk`: loan origination and installment servicing
//! - `EngineError` / `ErrorKind`: unified failure surface

pub mod cards;
pub mod engine;
pub mod error;
pub mod loans;
pub mod processor;

pub use cards::CardAuthorizer;
pub use engine::BankEngine;
pub use error::{EngineError, ErrorKind};
pub use loans::LoanDesk;
pub use processor::TransferProcessor;

// Downstream callers get the whole domain vocabulary from this crate.
pub use corebank_accounts::{Account, AccountError, AccountStatus, Card, CardStatus};
pub use corebank_core::{AccountId, Amount, Balance, CardId, LoanId, TransactionId, UserId};
pub use corebank_ledger::{FinancialSummary, Transaction, TransactionKind};
pub use corebank_loans::{Installment, Loan, LoanError, LoanStatus};
