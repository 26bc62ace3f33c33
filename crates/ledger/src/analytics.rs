//! Per-user financial summaries over the ledger and account store.

use corebank_accounts::AccountStore;
use corebank_core::{AccountId, Balance, UserId};
use serde::{Deserialize, Serialize};

use crate::ledger::TransactionLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account: AccountId,
    pub balance: Balance,
}

/// Money in, money out, and current balances across every account a user
/// owns. Totals are attributed per leg: a transfer between two accounts of
/// the same user counts toward both `total_in` and `total_out`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub user: UserId,
    pub total_in: i64,
    pub total_out: i64,
    pub accounts: Vec<AccountBalance>,
}

/// Scan all accounts owned by `user` and all transactions touching them.
/// A user with no accounts gets a zeroed summary.
pub fn summary_for_user(
    store: &AccountStore,
    ledger: &TransactionLedger,
    user: UserId,
) -> FinancialSummary {
    let accounts = store.accounts_for_user(user);
    let mut summary = FinancialSummary {
        user,
        total_in: 0,
        total_out: 0,
        accounts: Vec::with_capacity(accounts.len()),
    };
    for account in accounts {
        for transaction in ledger.transactions_for_account(account.id) {
            if transaction.destination == Some(account.id) {
                summary.total_in += transaction.amount.value();
            }
            if transaction.source == Some(account.id) {
                summary.total_out += transaction.amount.value();
            }
        }
        summary.accounts.push(AccountBalance {
            account: account.id,
            balance: account.balance,
        });
    }
    summary
}
