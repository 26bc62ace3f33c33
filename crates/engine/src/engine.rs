//! The bank engine facade
//!
//! One value owning the account store, the ledger, the loan book and the
//! components that move money between them. All public operations take
//! raw `i64` minor units and validate them here, so callers never
//! construct domain types themselves.

use std::sync::Arc;

use corebank_accounts::{Account, AccountStatus, AccountStore, Card, CardStatus};
use corebank_core::{AccountId, Amount, CardId, LoanId, UserId};
use corebank_ledger::{summary_for_user, FinancialSummary, Transaction, TransactionLedger};
use corebank_loans::{Installment, Loan, LoanBook, LoanError};
use rust_decimal::Decimal;

use crate::cards::CardAuthorizer;
use crate::error::EngineError;
use crate::loans::LoanDesk;
use crate::processor::TransferProcessor;

pub struct BankEngine {
    accounts: Arc<AccountStore>,
    ledger: Arc<TransactionLedger>,
    processor: TransferProcessor,
    authorizer: CardAuthorizer,
    desk: LoanDesk,
}

impl BankEngine {
    pub fn new() -> Self {
        let accounts = Arc::new(AccountStore::new());
        let ledger = Arc::new(TransactionLedger::new());
        let processor = TransferProcessor::new(Arc::clone(&accounts), Arc::clone(&ledger));
        let authorizer = CardAuthorizer::new(Arc::clone(&accounts), Arc::clone(&ledger));
        let desk = LoanDesk::new(
            Arc::new(LoanBook::new()),
            Arc::clone(&accounts),
            processor.clone(),
        );
        Self {
            accounts,
            ledger,
            processor,
            authorizer,
            desk,
        }
    }

    // ----- accounts -----

    /// Open a new active account with a zero balance.
    pub fn create_account(&self, owner: UserId) -> Account {
        self.accounts.create_account(owner)
    }

    pub fn account(&self, id: AccountId) -> Result<Account, EngineError> {
        Ok(self.accounts.account(id)?)
    }

    pub fn accounts_for_user(&self, owner: UserId) -> Vec<Account> {
        self.accounts.accounts_for_user(owner)
    }

    pub fn all_accounts(&self) -> Vec<Account> {
        self.accounts.all_accounts()
    }

    /// Freeze an account; deposits, debits and transfers are all refused
    /// until it is unfrozen.
    pub fn freeze_account(&self, id: AccountId) -> Result<(), EngineError> {
        self.accounts.set_status(id, AccountStatus::Frozen)?;
        Ok(())
    }

    pub fn unfreeze_account(&self, id: AccountId) -> Result<(), EngineError> {
        self.accounts.set_status(id, AccountStatus::Active)?;
        Ok(())
    }

    /// Close an account permanently. Any later status change or money
    /// movement is a state conflict.
    pub fn close_account(&self, id: AccountId) -> Result<(), EngineError> {
        self.accounts.set_status(id, AccountStatus::Closed)?;
        Ok(())
    }

    // ----- money movement -----

    pub fn deposit(&self, account: AccountId, amount: i64) -> Result<Transaction, EngineError> {
        let amount = Amount::new(amount)?;
        self.processor.deposit(account, amount)
    }

    pub fn transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: i64,
    ) -> Result<Transaction, EngineError> {
        let amount = Amount::new(amount)?;
        self.processor.transfer(source, destination, amount)
    }

    // ----- cards -----

    /// Issue a card funded by `account`. A limit, when given, caps each
    /// single authorization; it is not a running monthly budget.
    pub fn issue_card(
        &self,
        account: AccountId,
        spend_limit: Option<i64>,
    ) -> Result<Card, EngineError> {
        let limit = spend_limit.map(Amount::new).transpose()?;
        Ok(self.accounts.issue_card(account, limit)?)
    }

    pub fn cards_for_account(&self, account: AccountId) -> Result<Vec<Card>, EngineError> {
        Ok(self.accounts.cards_for_account(account)?)
    }

    pub fn authorize_card_payment(
        &self,
        card: CardId,
        amount: i64,
    ) -> Result<Transaction, EngineError> {
        let amount = Amount::new(amount)?;
        self.authorizer.authorize(card, amount)
    }

    /// Block a card. Blocked cards decline every authorization.
    pub fn block_card(&self, card: CardId) -> Result<(), EngineError> {
        self.accounts.set_card_status(card, CardStatus::Blocked)?;
        Ok(())
    }

    // ----- loans -----

    pub fn apply_loan(
        &self,
        account: AccountId,
        principal: i64,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> Result<Loan, EngineError> {
        let principal = Amount::new(principal).map_err(|_| {
            EngineError::Loan(LoanError::InvalidTerms {
                reason: "principal must be positive".into(),
            })
        })?;
        self.desk
            .apply(account, principal, annual_rate_percent, term_months)
    }

    pub fn loan(&self, id: LoanId) -> Result<Loan, EngineError> {
        self.desk.loan(id)
    }

    pub fn loan_schedule(&self, id: LoanId) -> Result<Vec<Installment>, EngineError> {
        self.desk.schedule(id)
    }

    pub fn repay_next_installment(&self, id: LoanId) -> Result<Transaction, EngineError> {
        self.desk.repay_next(id)
    }

    // ----- history & analytics -----

    /// Every transaction touching `account`, oldest first. Unknown
    /// accounts simply have no history.
    pub fn transactions_for_account(&self, account: AccountId) -> Vec<Transaction> {
        self.ledger.transactions_for_account(account)
    }

    /// Aggregate across all of a user's accounts; zeroed when the user
    /// owns nothing.
    pub fn financial_summary(&self, user: UserId) -> FinancialSummary {
        summary_for_user(&self.accounts, &self.ledger, user)
    }
}

impl Default for BankEngine {
    fn default() -> Self {
        Self::new()
    }
}
