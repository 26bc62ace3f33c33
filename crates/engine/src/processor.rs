//! Deposits, transfers and loan money legs
//!
//! Every mutation follows the same shape: enter the account critical
//! section, apply the balance change, and append the ledger entry before
//! the section ends. Recording inside the section is what keeps each
//! account's ledger history in the same order its balance actually moved.

use std::sync::Arc;

use corebank_accounts::{AccountError, AccountStore};
use corebank_core::{AccountId, Amount};
use corebank_ledger::{Transaction, TransactionDraft, TransactionLedger};

use crate::error::EngineError;

/// Moves money between accounts and writes the matching ledger entries.
#[derive(Clone)]
pub struct TransferProcessor {
    accounts: Arc<AccountStore>,
    ledger: Arc<TransactionLedger>,
}

enum CreditKind {
    Deposit,
    LoanDisbursement,
}

impl TransferProcessor {
    pub(crate) fn new(accounts: Arc<AccountStore>, ledger: Arc<TransactionLedger>) -> Self {
        Self { accounts, ledger }
    }

    /// Credit an external deposit to an account.
    pub fn deposit(&self, account: AccountId, amount: Amount) -> Result<Transaction, EngineError> {
        self.credit(account, amount, CreditKind::Deposit)
    }

    /// Credit a loan disbursement to the borrower's account.
    pub fn disburse(&self, account: AccountId, amount: Amount) -> Result<Transaction, EngineError> {
        self.credit(account, amount, CreditKind::LoanDisbursement)
    }

    fn credit(
        &self,
        account: AccountId,
        amount: Amount,
        kind: CreditKind,
    ) -> Result<Transaction, EngineError> {
        let transaction = self
            .accounts
            .with_account(account, |acc| {
                let balance = acc.apply_delta(amount.value())?;
                let draft = match kind {
                    CreditKind::Deposit => TransactionDraft::deposit(account, amount, balance),
                    CreditKind::LoanDisbursement => {
                        TransactionDraft::loan_disbursement(account, amount, balance)
                    }
                };
                Ok::<_, AccountError>(self.ledger.record(draft))
            })??;
        tracing::info!(
            transaction = %transaction.id,
            account = %account,
            amount = %amount,
            kind = %transaction.kind,
            "credit committed"
        );
        Ok(transaction)
    }

    /// Debit a collected loan installment from the borrower's account.
    pub fn collect_repayment(
        &self,
        account: AccountId,
        amount: Amount,
    ) -> Result<Transaction, EngineError> {
        let transaction = self
            .accounts
            .with_account(account, |acc| {
                let balance = acc.apply_delta(-amount.value())?;
                let draft = TransactionDraft::loan_repayment(account, amount, balance);
                Ok::<_, AccountError>(self.ledger.record(draft))
            })??;
        tracing::info!(
            transaction = %transaction.id,
            account = %account,
            amount = %amount,
            "repayment collected"
        );
        Ok(transaction)
    }

    /// Move `amount` between two accounts atomically.
    ///
    /// Both accounts are locked for the whole operation (ascending-id
    /// order), so no observer sees the debit without the credit. If the
    /// credit leg fails after the debit landed, the debit is reversed
    /// inside the same critical section and the error surfaces as
    /// [`EngineError::Internal`].
    pub fn transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Amount,
    ) -> Result<Transaction, EngineError> {
        if source == destination {
            return Err(EngineError::SameAccount(source));
        }
        let transaction = self
            .accounts
            .with_pair(source, destination, |src, dst| {
                src.ensure_active()?;
                dst.ensure_active()?;
                let source_after = src.apply_delta(-amount.value())?;
                let destination_after = match dst.apply_delta(amount.value()) {
                    Ok(balance) => balance,
                    Err(credit_err) => {
                        tracing::warn!(
                            source = %source,
                            destination = %destination,
                            error = %credit_err,
                            "credit leg failed, reversing debit"
                        );
                        if let Err(rollback_err) = src.apply_delta(amount.value()) {
                            tracing::error!(
                                source = %source,
                                error = %rollback_err,
                                "debit reversal failed"
                            );
                            return Err(EngineError::Internal(format!(
                                "credit leg failed ({credit_err}) and debit reversal failed ({rollback_err})"
                            )));
                        }
                        return Err(EngineError::Internal(format!(
                            "credit leg failed: {credit_err}"
                        )));
                    }
                };
                let draft = TransactionDraft::transfer(
                    source,
                    destination,
                    amount,
                    source_after,
                    destination_after,
                );
                Ok(self.ledger.record(draft))
            })??;
        tracing::info!(
            transaction = %transaction.id,
            source = %source,
            destination = %destination,
            amount = %amount,
            "transfer committed"
        );
        Ok(transaction)
    }
}
