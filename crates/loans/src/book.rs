//! Loan book with one lock per loan
//!
//! Same shape as the account store: a read-mostly map of `Arc<Mutex<Loan>>`
//! entries, with the map guard always released before a loan mutex is
//! taken. Repayment mutates loan state through `with_loan` so progress
//! checks and updates happen in one critical section.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use corebank_core::{AccountId, Amount, LoanId};
use rust_decimal::Decimal;

use crate::error::LoanError;
use crate::loan::{Installment, Loan};

pub struct LoanBook {
    loans: RwLock<HashMap<LoanId, Arc<Mutex<Loan>>>>,
    next_loan_id: AtomicU64,
}

impl LoanBook {
    pub fn new() -> Self {
        Self {
            loans: RwLock::new(HashMap::new()),
            next_loan_id: AtomicU64::new(1),
        }
    }

    /// Register an originated loan and return its initial snapshot.
    ///
    /// Terms are validated by the schedule builder before this is called;
    /// the book itself only mints the id and stores the record.
    pub fn issue(
        &self,
        account_id: AccountId,
        principal: Amount,
        annual_rate_percent: Decimal,
        term_months: u32,
        created_at: DateTime<Utc>,
        schedule: Vec<Installment>,
    ) -> Loan {
        let id = LoanId::new(self.next_loan_id.fetch_add(1, Ordering::SeqCst));
        let loan = Loan::new(
            id,
            account_id,
            principal,
            annual_rate_percent,
            term_months,
            created_at,
            schedule,
        );
        tracing::debug!(
            loan_id = %id,
            account_id = %account_id,
            principal = %principal,
            term_months,
            "loan issued"
        );
        let mut loans = self.loans.write().unwrap();
        loans.insert(id, Arc::new(Mutex::new(loan.clone())));
        loan
    }

    fn entry(&self, id: LoanId) -> Result<Arc<Mutex<Loan>>, LoanError> {
        let loans = self.loans.read().unwrap();
        loans.get(&id).cloned().ok_or(LoanError::LoanNotFound(id))
    }

    /// Run `f` with the loan locked. Errors from `f` pass through.
    pub fn with_loan<R, E>(
        &self,
        id: LoanId,
        f: impl FnOnce(&mut Loan) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<LoanError>,
    {
        let entry = self.entry(id).map_err(E::from)?;
        let mut loan = entry.lock().unwrap();
        f(&mut loan)
    }

    /// Point-in-time snapshot of a loan.
    pub fn get(&self, id: LoanId) -> Result<Loan, LoanError> {
        let entry = self.entry(id)?;
        let loan = entry.lock().unwrap();
        Ok(loan.clone())
    }

    /// The full schedule as computed at origination.
    pub fn schedule(&self, id: LoanId) -> Result<Vec<Installment>, LoanError> {
        Ok(self.get(id)?.schedule)
    }
}

impl Default for LoanBook {
    fn default() -> Self {
        Self::new()
    }
}
