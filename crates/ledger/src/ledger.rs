//! The append-only transaction log.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use corebank_core::{AccountId, TransactionId};

use crate::transaction::{Transaction, TransactionDraft};

/// Append-only log of every balance-affecting event, indexed by account.
///
/// One mutex guards id allocation, the entry vector, and the index, so an
/// append is a single atomic step and ids equal append order. The mutex is a
/// leaf in the system's lock order: nothing acquires another lock while
/// holding it, and it is independent of any account lock, so appends never
/// block unrelated account mutations.
#[derive(Debug)]
pub struct TransactionLedger {
    inner: Mutex<LedgerInner>,
}

#[derive(Debug)]
struct LedgerInner {
    next_id: u64,
    entries: Vec<Transaction>,
    by_account: HashMap<AccountId, Vec<usize>>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerInner {
                next_id: 1,
                entries: Vec::new(),
                by_account: HashMap::new(),
            }),
        }
    }

    /// The single write path. Assigns the next id, stamps the time, stores
    /// the entry and indexes it under every account it references.
    ///
    /// Components call this while still holding the account lock(s) the
    /// draft's snapshots came from; that is what keeps a single account's
    /// entries in the same order as its balance mutations.
    pub fn record(&self, draft: TransactionDraft) -> Transaction {
        let mut inner = self.inner.lock().unwrap();
        let id = TransactionId::new(inner.next_id);
        inner.next_id += 1;
        let transaction = Transaction {
            id,
            kind: draft.kind,
            source: draft.source,
            destination: draft.destination,
            amount: draft.amount,
            timestamp: Utc::now(),
            source_balance: draft.source_balance,
            destination_balance: draft.destination_balance,
        };
        let index = inner.entries.len();
        if let Some(account) = transaction.source {
            inner.by_account.entry(account).or_default().push(index);
        }
        if let Some(account) = transaction.destination {
            inner.by_account.entry(account).or_default().push(index);
        }
        inner.entries.push(transaction.clone());
        tracing::debug!(
            tx = %id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "transaction recorded"
        );
        transaction
    }

    /// All entries touching `account`, in chronological (= id) order.
    /// Unknown accounts yield an empty vector.
    pub fn transactions_for_account(&self, account: AccountId) -> Vec<Transaction> {
        let inner = self.inner.lock().unwrap();
        inner
            .by_account
            .get(&account)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| inner.entries[index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, id: TransactionId) -> Option<Transaction> {
        let inner = self.inner.lock().unwrap();
        // ids are dense from 1, so entry i holds id i+1
        let index = id.value().checked_sub(1)?;
        inner.entries.get(index as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}
