//! Corebank Account Store - accounts, cards, per-account locking
//!
//! Every balance in the system lives here. The store hands out exclusive
//! per-account critical sections; all higher layers mutate balances only
//! through them.
//!
//! # Key Types
//! - `Account` / `AccountStatus`: balance-holding record and its lifecycle
//! - `Card` / `CardStatus`: debit card linked to one account
//! - `AccountStore`: arena of lock-wrapped accounts plus the card table
//! - `AccountError`: every way an account or card operation can be refused

pub mod account;
pub mod card;
pub mod error;
pub mod store;

pub use account::{Account, AccountStatus};
pub use card::{Card, CardStatus};
pub use error::AccountError;
pub use store::AccountStore;
