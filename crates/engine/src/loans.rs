//! Loan origination and installment servicing

use std::sync::Arc;

use chrono::Utc;
use corebank_accounts::AccountStore;
use corebank_core::{AccountId, Amount, LoanId};
use corebank_ledger::Transaction;
use corebank_loans::{build_schedule, Installment, Loan, LoanBook, LoanError};
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::processor::TransferProcessor;

/// Originates loans and collects their installments.
pub struct LoanDesk {
    book: Arc<LoanBook>,
    accounts: Arc<AccountStore>,
    processor: TransferProcessor,
}

impl LoanDesk {
    pub(crate) fn new(
        book: Arc<LoanBook>,
        accounts: Arc<AccountStore>,
        processor: TransferProcessor,
    ) -> Self {
        Self {
            book,
            accounts,
            processor,
        }
    }

    /// Originate a loan: validate terms, compute the schedule, disburse
    /// the principal into the borrower's account, then register the loan.
    ///
    /// If the disbursement fails nothing is registered, so every loan in
    /// the book has its principal on the ledger.
    pub fn apply(
        &self,
        account_id: AccountId,
        principal: Amount,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> Result<Loan, EngineError> {
        let account = self.accounts.account(account_id)?;
        account.ensure_active()?;

        let created_at = Utc::now();
        let schedule = build_schedule(principal, annual_rate_percent, term_months, created_at)?;
        self.processor.disburse(account_id, principal)?;
        let loan = self.book.issue(
            account_id,
            principal,
            annual_rate_percent,
            term_months,
            created_at,
            schedule,
        );
        tracing::info!(
            loan = %loan.id,
            account = %account_id,
            principal = %principal,
            rate = %annual_rate_percent,
            term_months,
            "loan originated"
        );
        Ok(loan)
    }

    /// Point-in-time snapshot of a loan.
    pub fn loan(&self, id: LoanId) -> Result<Loan, EngineError> {
        Ok(self.book.get(id)?)
    }

    /// The schedule as computed at origination.
    pub fn schedule(&self, id: LoanId) -> Result<Vec<Installment>, EngineError> {
        Ok(self.book.schedule(id)?)
    }

    /// Collect the next installment due on a loan.
    ///
    /// Periods whose total rounds to zero are skipped, not collected. The
    /// account debit and the paid-period advance happen while the loan is
    /// locked, so concurrent repayments collect distinct periods and a
    /// failed debit leaves the loan exactly where it was.
    pub fn repay_next(&self, id: LoanId) -> Result<Transaction, EngineError> {
        self.book.with_loan(id, |loan| {
            while loan.next_installment().is_some_and(|row| row.total() == 0) {
                loan.mark_period_paid();
            }
            let installment = *loan
                .next_installment()
                .ok_or(LoanError::LoanClosed(id))?;
            let amount = Amount::new(installment.total()).map_err(|err| {
                EngineError::Internal(format!("installment total invalid: {err}"))
            })?;
            let transaction = self.processor.collect_repayment(loan.account_id, amount)?;
            loan.mark_period_paid();
            tracing::info!(
                loan = %id,
                period = installment.period,
                amount = %amount,
                status = %loan.status,
                "installment collected"
            );
            Ok(transaction)
        })
    }
}
