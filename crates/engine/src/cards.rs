//! Card payment authorization

use std::sync::Arc;

use corebank_accounts::{AccountError, AccountStore};
use corebank_core::{Amount, CardId};
use corebank_ledger::{Transaction, TransactionDraft, TransactionLedger};

use crate::error::EngineError;

/// Authorizes card payments against the funding account.
#[derive(Clone)]
pub struct CardAuthorizer {
    accounts: Arc<AccountStore>,
    ledger: Arc<TransactionLedger>,
}

impl CardAuthorizer {
    pub(crate) fn new(accounts: Arc<AccountStore>, ledger: Arc<TransactionLedger>) -> Self {
        Self { accounts, ledger }
    }

    /// Authorize and settle a card payment in one step.
    ///
    /// Checks run in order: card exists, card is active, amount fits the
    /// card's spend limit, then the funding-account debit. The debit and
    /// its ledger entry commit together inside the account's critical
    /// section, so concurrent authorizations against one account settle
    /// strictly one at a time.
    pub fn authorize(&self, card_id: CardId, amount: Amount) -> Result<Transaction, EngineError> {
        let card = self.accounts.card(card_id)?;
        if !card.is_active() {
            tracing::warn!(card = %card_id, "card payment declined: card blocked");
            return Err(AccountError::CardBlocked(card_id).into());
        }
        if let Some(limit) = card.spend_limit {
            if amount > limit {
                tracing::warn!(
                    card = %card_id,
                    amount = %amount,
                    limit = %limit,
                    "card payment declined: over spend limit"
                );
                return Err(AccountError::SpendLimitExceeded {
                    card: card_id,
                    limit: limit.value(),
                    requested: amount.value(),
                }
                .into());
            }
        }

        let result = self
            .accounts
            .with_account(card.account_id, |account| {
                let balance = account.apply_delta(-amount.value())?;
                let draft = TransactionDraft::card_payment(card.account_id, amount, balance);
                Ok::<_, AccountError>(self.ledger.record(draft))
            })
            .and_then(|inner| inner);
        match result {
            Ok(transaction) => {
                tracing::info!(
                    transaction = %transaction.id,
                    card = %card_id,
                    account = %card.account_id,
                    amount = %amount,
                    "card payment authorized"
                );
                Ok(transaction)
            }
            Err(err) => {
                tracing::warn!(
                    card = %card_id,
                    account = %card.account_id,
                    amount = %amount,
                    error = %err,
                    "card payment declined"
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corebank_accounts::CardStatus;
    use corebank_core::UserId;
    use corebank_ledger::TransactionKind;

    fn amount(val: i64) -> Amount {
        Amount::new(val).unwrap()
    }

    fn setup_with_card(
        balance: i64,
        limit: Option<i64>,
    ) -> (Arc<AccountStore>, Arc<TransactionLedger>, CardAuthorizer, CardId) {
        let accounts = Arc::new(AccountStore::new());
        let ledger = Arc::new(TransactionLedger::new());
        let id = accounts.create_account(UserId::new(1)).id;
        if balance > 0 {
            accounts.adjust_balance(id, balance).unwrap();
        }
        let card = accounts
            .issue_card(id, limit.map(|l| Amount::new(l).unwrap()))
            .unwrap();
        let authorizer = CardAuthorizer::new(Arc::clone(&accounts), Arc::clone(&ledger));
        (accounts, ledger, authorizer, card.id)
    }

    #[test]
    fn test_authorize_debits_and_records() {
        let (accounts, ledger, authorizer, card) = setup_with_card(1000, None);
        let tx = authorizer.authorize(card, amount(250)).unwrap();
        assert_eq!(tx.kind, TransactionKind::CardPayment);
        assert_eq!(tx.source_balance.unwrap().value(), 750);
        assert_eq!(tx.destination, None);

        let account = tx.source.unwrap();
        assert_eq!(accounts.balance(account).unwrap().value(), 750);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_blocked_card_is_declined() {
        let (accounts, ledger, authorizer, card) = setup_with_card(1000, None);
        accounts.set_card_status(card, CardStatus::Blocked).unwrap();
        assert_eq!(
            authorizer.authorize(card, amount(10)).unwrap_err(),
            EngineError::Account(AccountError::CardBlocked(card))
        );
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_spend_limit_is_enforced_per_authorization() {
        let (_accounts, ledger, authorizer, card) = setup_with_card(10_000, Some(300));
        // at the limit passes, one unit over does not
        authorizer.authorize(card, amount(300)).unwrap();
        let err = authorizer.authorize(card, amount(301)).unwrap_err();
        assert_eq!(
            err,
            EngineError::Account(AccountError::SpendLimitExceeded {
                card,
                limit: 300,
                requested: 301,
            })
        );
        // consecutive payments under the limit are all fine
        authorizer.authorize(card, amount(300)).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_insufficient_funds_declines_without_entry() {
        let (accounts, ledger, authorizer, card) = setup_with_card(100, None);
        let err = authorizer.authorize(card, amount(500)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Account(AccountError::InsufficientFunds { .. })
        ));
        let account = accounts.card(card).unwrap().account_id;
        assert_eq!(accounts.balance(account).unwrap().value(), 100);
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_unknown_card_is_not_found() {
        let accounts = Arc::new(AccountStore::new());
        let ledger = Arc::new(TransactionLedger::new());
        let authorizer = CardAuthorizer::new(accounts, ledger);
        assert_eq!(
            authorizer.authorize(CardId::new(77), amount(10)).unwrap_err(),
            EngineError::Account(AccountError::CardNotFound(CardId::new(77)))
        );
    }
}
