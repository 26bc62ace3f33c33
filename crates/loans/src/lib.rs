//! Corebank Loans - fixed-payment amortization and the loan book
//!
//! A loan's schedule is computed once at creation and never mutated; the
//! cent-accuracy invariant is that the principal portions of a schedule sum
//! exactly to the loan's principal.
//!
//! # Key Types
//! - `Loan` / `LoanStatus` / `Installment`: the loan record and its schedule
//! - `build_schedule`: the deterministic amortization computation
//! - `LoanBook`: lock-per-loan store mirroring the account store's shape
//! - `LoanError`: invalid terms, unknown loan, closed loan

pub mod book;
pub mod error;
pub mod loan;
pub mod schedule;

pub use book::LoanBook;
pub use error::LoanError;
pub use loan::{Installment, Loan, LoanStatus};
pub use schedule::{build_schedule, monthly_rate, MAX_TERM_MONTHS};
