//! Corebank Core - Domain types
//!
//! This crate contains the fundamental types used across Corebank:
//! - Typed ids (`UserId`, `AccountId`, `CardId`, `LoanId`, `TransactionId`)
//! - `Amount`: Strictly positive integer minor units for money movements
//! - `Balance`: Non-negative integer minor units for stored balances

pub mod id;
pub mod money;

pub use id::{AccountId, CardId, LoanId, TransactionId, UserId};
pub use money::{Amount, Balance, MoneyError};
