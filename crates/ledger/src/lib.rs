//! Corebank Ledger - append-only transaction log and analytics
//!
//! Every balance-affecting event in the system becomes exactly one entry
//! here, written through the single `TransactionLedger::record` path while
//! the relevant account lock is held.
//!
//! # Key Types
//! - `Transaction` / `TransactionKind`: one immutable ledger entry
//! - `TransactionDraft`: the legs/amount/snapshot bundle a component hands
//!   to the ledger; the ledger assigns id and timestamp
//! - `TransactionLedger`: the log plus its per-account index
//! - `FinancialSummary`: per-user totals computed from the log

pub mod analytics;
pub mod ledger;
pub mod transaction;

pub use analytics::{summary_for_user, AccountBalance, FinancialSummary};
pub use ledger::TransactionLedger;
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
