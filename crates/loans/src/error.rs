//! Loan error types

use corebank_core::LoanId;
use thiserror::Error;

/// Errors raised while originating or servicing loans.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    /// Origination inputs that no schedule can be built from.
    #[error("Invalid loan terms: {reason}")]
    InvalidTerms { reason: String },

    /// Loan does not exist in the book.
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    /// Loan is fully repaid; no further installments are due.
    #[error("Loan is closed: {0}")]
    LoanClosed(LoanId),
}

impl LoanError {
    pub(crate) fn invalid_terms(reason: impl Into<String>) -> Self {
        Self::InvalidTerms {
            reason: reason.into(),
        }
    }
}
