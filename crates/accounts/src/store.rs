//! In-memory account and card tables with per-account mutation locks.
//!
//! The account map is a `RwLock<HashMap>` of `Arc<Mutex<Account>>` entries:
//! the outer lock guards only lookup and insert, the inner mutex serializes
//! every balance mutation of one account. Unrelated accounts therefore
//! mutate in parallel; there is no store-wide write lock on the money path.
//!
//! Lock discipline, relied on by everything above this crate:
//! - the map guard is never held across an account mutex acquisition
//! - `with_pair` takes the two account mutexes in ascending-id order
//! - no code path takes a second account mutex while holding one, other
//!   than `with_pair`

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use corebank_core::{AccountId, Amount, Balance, CardId, UserId};

use crate::account::{Account, AccountStatus};
use crate::card::{Card, CardStatus};
use crate::error::AccountError;

#[derive(Debug)]
pub struct AccountStore {
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<Account>>>>,
    cards: RwLock<HashMap<CardId, Card>>,
    next_account_id: AtomicU64,
    next_card_id: AtomicU64,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            cards: RwLock::new(HashMap::new()),
            next_account_id: AtomicU64::new(1),
            next_card_id: AtomicU64::new(1),
        }
    }

    /// Open a new, empty, active account for `owner`.
    pub fn create_account(&self, owner: UserId) -> Account {
        let id = AccountId::new(self.next_account_id.fetch_add(1, Ordering::SeqCst));
        let account = Account::new(id, owner, Utc::now());
        self.accounts
            .write()
            .unwrap()
            .insert(id, Arc::new(Mutex::new(account.clone())));
        tracing::debug!(account = %id, owner = %owner, "account created");
        account
    }

    fn entry(&self, id: AccountId) -> Result<Arc<Mutex<Account>>, AccountError> {
        let accounts = self.accounts.read().unwrap();
        accounts
            .get(&id)
            .cloned()
            .ok_or(AccountError::AccountNotFound(id))
    }

    /// Run `f` with exclusive access to one account.
    pub fn with_account<R>(
        &self,
        id: AccountId,
        f: impl FnOnce(&mut Account) -> R,
    ) -> Result<R, AccountError> {
        let entry = self.entry(id)?;
        let mut account = entry.lock().unwrap();
        Ok(f(&mut account))
    }

    /// Run `f` with exclusive access to two distinct accounts.
    ///
    /// The two mutexes are taken in ascending account-id order no matter the
    /// argument order, so concurrent opposite-direction calls cannot
    /// deadlock. `f` receives the accounts in the caller's order.
    ///
    /// # Panics
    /// Panics if `first == second`; callers validate that before getting here.
    pub fn with_pair<R>(
        &self,
        first: AccountId,
        second: AccountId,
        f: impl FnOnce(&mut Account, &mut Account) -> R,
    ) -> Result<R, AccountError> {
        assert_ne!(first, second, "with_pair needs two distinct accounts");
        let first_entry = self.entry(first)?;
        let second_entry = self.entry(second)?;
        if first < second {
            let mut a = first_entry.lock().unwrap();
            let mut b = second_entry.lock().unwrap();
            Ok(f(&mut a, &mut b))
        } else {
            let mut b = second_entry.lock().unwrap();
            let mut a = first_entry.lock().unwrap();
            Ok(f(&mut a, &mut b))
        }
    }

    /// Atomically apply a signed balance change. Positive credits, negative
    /// debits; see `Account::apply_delta` for the failure modes.
    pub fn adjust_balance(&self, id: AccountId, delta: i64) -> Result<Balance, AccountError> {
        let result = self.with_account(id, |account| account.apply_delta(delta))?;
        match &result {
            Ok(balance) => {
                tracing::debug!(account = %id, delta, balance = %balance, "balance adjusted")
            }
            Err(err) => {
                tracing::debug!(account = %id, delta, error = %err, "balance adjustment refused")
            }
        }
        result
    }

    pub fn balance(&self, id: AccountId) -> Result<Balance, AccountError> {
        self.with_account(id, |account| account.balance)
    }

    /// Snapshot one account.
    pub fn account(&self, id: AccountId) -> Result<Account, AccountError> {
        self.with_account(id, |account| account.clone())
    }

    /// Snapshot every account owned by `owner`, ordered by id.
    pub fn accounts_for_user(&self, owner: UserId) -> Vec<Account> {
        let mut matches: Vec<Account> = self
            .entries()
            .iter()
            .map(|entry| entry.lock().unwrap().clone())
            .filter(|account| account.owner == owner)
            .collect();
        matches.sort_by_key(|account| account.id);
        matches
    }

    /// Snapshot every account in the store, ordered by id.
    pub fn all_accounts(&self) -> Vec<Account> {
        let mut all: Vec<Account> = self
            .entries()
            .iter()
            .map(|entry| entry.lock().unwrap().clone())
            .collect();
        all.sort_by_key(|account| account.id);
        all
    }

    fn entries(&self) -> Vec<Arc<Mutex<Account>>> {
        self.accounts.read().unwrap().values().cloned().collect()
    }

    /// Change an account's status. Closed accounts are terminal.
    pub fn set_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<AccountStatus, AccountError> {
        let result = self.with_account(id, |account| {
            if account.status == AccountStatus::Closed {
                return Err(AccountError::AccountClosed(id));
            }
            account.status = status;
            Ok(status)
        })?;
        if result.is_ok() {
            tracing::info!(account = %id, %status, "account status changed");
        }
        result
    }

    /// Issue a card for an existing account. The account only has to exist;
    /// its status is checked at authorization time, not here.
    pub fn issue_card(
        &self,
        account_id: AccountId,
        spend_limit: Option<Amount>,
    ) -> Result<Card, AccountError> {
        self.entry(account_id)?;
        let id = CardId::new(self.next_card_id.fetch_add(1, Ordering::SeqCst));
        let card = Card::new(id, account_id, spend_limit, Utc::now());
        self.cards.write().unwrap().insert(id, card.clone());
        tracing::info!(card = %id, account = %account_id, number = %card.number, "card issued");
        Ok(card)
    }

    pub fn card(&self, id: CardId) -> Result<Card, AccountError> {
        self.cards
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AccountError::CardNotFound(id))
    }

    /// Cards linked to an account, ordered by id. The account must exist.
    pub fn cards_for_account(&self, account_id: AccountId) -> Result<Vec<Card>, AccountError> {
        self.entry(account_id)?;
        let mut cards: Vec<Card> = self
            .cards
            .read()
            .unwrap()
            .values()
            .filter(|card| card.account_id == account_id)
            .cloned()
            .collect();
        cards.sort_by_key(|card| card.id);
        Ok(cards)
    }

    pub fn set_card_status(
        &self,
        id: CardId,
        status: CardStatus,
    ) -> Result<CardStatus, AccountError> {
        let mut cards = self.cards.write().unwrap();
        let card = cards.get_mut(&id).ok_or(AccountError::CardNotFound(id))?;
        card.status = status;
        tracing::info!(card = %id, %status, "card status changed");
        Ok(status)
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
