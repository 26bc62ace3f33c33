//! Integration tests for the corebank engine
//!
//! These tests drive the public `BankEngine` facade the way request
//! handlers would: many threads, no reaching into internals, and every
//! check phrased in terms of balances, histories and summaries.

use std::thread;

use corebank_engine::{
    AccountId, AccountStatus, BankEngine, ErrorKind, LoanStatus, TransactionKind, UserId,
};
use rust_decimal_macros::dec;

fn last_recorded_balance(engine: &BankEngine, account: AccountId) -> Option<i64> {
    let history = engine.transactions_for_account(account);
    let last = history.last()?;
    let balance = if last.destination == Some(account) {
        last.destination_balance
    } else {
        last.source_balance
    };
    balance.map(|b| b.value())
}

/// Test: account creation → deposit → transfer → history and summary.
#[test]
fn test_full_workflow() {
    let engine = BankEngine::new();
    let alice = UserId::new(1);

    // 1. Two fresh accounts, zero balance, active
    let a = engine.create_account(alice).id;
    let b = engine.create_account(alice).id;
    assert!(a < b);
    assert_eq!(engine.account(a).unwrap().status, AccountStatus::Active);
    assert_eq!(engine.account(a).unwrap().balance.value(), 0);

    // 2. Deposit 1000 into the first account
    let deposit = engine.deposit(a, 1000).unwrap();
    assert_eq!(deposit.kind, TransactionKind::Deposit);
    assert_eq!(deposit.destination_balance.unwrap().value(), 1000);

    // 3. Transfer 400 across
    let transfer = engine.transfer(a, b, 400).unwrap();
    assert_eq!(transfer.source_balance.unwrap().value(), 600);
    assert_eq!(transfer.destination_balance.unwrap().value(), 400);
    assert_eq!(engine.account(a).unwrap().balance.value(), 600);
    assert_eq!(engine.account(b).unwrap().balance.value(), 400);

    // 4. Transaction ids are monotonic and the transfer shows on both sides
    assert!(deposit.id < transfer.id);
    let history_a = engine.transactions_for_account(a);
    assert_eq!(history_a.len(), 2);
    let history_b = engine.transactions_for_account(b);
    assert_eq!(history_b, vec![transfer]);

    // 5. Summary sees both accounts and both directions
    let summary = engine.financial_summary(alice);
    assert_eq!(summary.total_in, 1400);
    assert_eq!(summary.total_out, 400);
    assert_eq!(summary.accounts.len(), 2);
}

/// Test: money is conserved under concurrent deposits, card payments and
/// loan repayments.
#[test]
fn test_balances_reconcile_under_concurrent_traffic() {
    const THREADS: usize = 8;
    const ITERS: usize = 50;

    let engine = BankEngine::new();
    let accounts: Vec<AccountId> = (0..4)
        .map(|i| engine.create_account(UserId::new(i + 1)).id)
        .collect();
    let cards: Vec<_> = accounts
        .iter()
        .map(|&id| engine.issue_card(id, None).unwrap().id)
        .collect();
    // interest-free so every installment is exactly 500
    let loan_id = engine.apply_loan(accounts[0], 5000, dec!(0), 10).unwrap().id;

    let totals: Vec<(i64, i64, i64)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let engine = &engine;
                let accounts = &accounts;
                let cards = &cards;
                scope.spawn(move || {
                    let mut deposited = 0i64;
                    let mut spent = 0i64;
                    let mut repaid = 0i64;
                    for i in 0..ITERS {
                        engine.deposit(accounts[(t + i) % accounts.len()], 10).unwrap();
                        deposited += 10;
                        // may race ahead of the deposits and bounce; only
                        // settled payments count
                        if engine
                            .authorize_card_payment(cards[(t + 3 * i) % cards.len()], 3)
                            .is_ok()
                        {
                            spent += 3;
                        }
                        // threads compete for the ten installments; once the
                        // loan closes these calls bounce and tally nothing
                        if i % 16 == t {
                            if let Ok(tx) = engine.repay_next_installment(loan_id) {
                                repaid += tx.amount.value();
                            }
                        }
                    }
                    (deposited, spent, repaid)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let deposited: i64 = totals.iter().map(|(d, _, _)| d).sum();
    let spent: i64 = totals.iter().map(|(_, s, _)| s).sum();
    let repaid: i64 = totals.iter().map(|(_, _, r)| r).sum();
    assert_eq!(deposited, (THREADS * ITERS) as i64 * 10);
    assert_eq!(repaid % 500, 0, "repayments settle whole installments");
    assert!(repaid <= 5000);

    let held: i64 = engine
        .all_accounts()
        .iter()
        .map(|account| account.balance.value())
        .sum();
    assert_eq!(held, deposited + 5000 - spent - repaid, "money appeared or vanished");

    // the newest ledger entry of each account agrees with its balance
    for &id in &accounts {
        assert_eq!(
            last_recorded_balance(&engine, id),
            Some(engine.account(id).unwrap().balance.value())
        );
    }
}

/// Test: N racing authorizations against one card settle exactly K times.
#[test]
fn test_card_authorizations_race_for_limited_funds() {
    let engine = BankEngine::new();
    let account = engine.create_account(UserId::new(1)).id;
    engine.deposit(account, 500).unwrap();
    let card = engine.issue_card(account, None).unwrap().id;

    let outcomes: Vec<Result<(), ErrorKind>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let engine = &engine;
                scope.spawn(move || {
                    engine
                        .authorize_card_payment(card, 100)
                        .map(|_| ())
                        .map_err(|err| err.kind())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let settled = outcomes.iter().filter(|o| o.is_ok()).count();
    let bounced = outcomes
        .iter()
        .filter(|o| **o == Err(ErrorKind::InsufficientFunds))
        .count();
    assert_eq!(settled, 5, "500 in balance funds exactly five payments of 100");
    assert_eq!(bounced, 11);
    assert_eq!(engine.account(account).unwrap().balance.value(), 0);

    let payments = engine
        .transactions_for_account(account)
        .into_iter()
        .filter(|tx| tx.kind == TransactionKind::CardPayment)
        .count();
    assert_eq!(payments, 5);
}

/// Test: a transfer whose credit leg cannot apply rolls back completely.
#[test]
fn test_transfer_rolls_back_when_credit_cannot_apply() {
    let engine = BankEngine::new();
    let a = engine.create_account(UserId::new(1)).id;
    let b = engine.create_account(UserId::new(2)).id;
    engine.deposit(a, 100).unwrap();
    engine.deposit(b, i64::MAX).unwrap();

    let err = engine.transfer(a, b, 50).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(engine.account(a).unwrap().balance.value(), 100);
    assert_eq!(engine.account(b).unwrap().balance.value(), i64::MAX);
    // no half-applied transfer on either history
    assert_eq!(engine.transactions_for_account(a).len(), 1);
    assert_eq!(engine.transactions_for_account(b).len(), 1);
}

/// Test: full loan lifecycle at 12% over 12 months.
#[test]
fn test_amortized_loan_lifecycle() {
    let engine = BankEngine::new();
    let account = engine.create_account(UserId::new(1)).id;

    // 1. Originate: principal lands immediately
    let loan = engine.apply_loan(account, 1200, dec!(12), 12).unwrap();
    assert_eq!(engine.account(account).unwrap().balance.value(), 1200);

    // 2. Schedule starts with 12 interest against a level payment of 107
    let schedule = engine.loan_schedule(loan.id).unwrap();
    assert_eq!(schedule.len(), 12);
    assert_eq!(schedule[0].interest, 12);
    assert_eq!(schedule[0].principal, 95);
    let borrowed: i64 = schedule.iter().map(|row| row.principal).sum();
    assert_eq!(borrowed, 1200);
    // fetching it again returns the same rows
    assert_eq!(engine.loan_schedule(loan.id).unwrap(), schedule);

    // 3. Top up to cover the interest, then pay the whole schedule down
    engine.deposit(account, 100).unwrap();
    for _ in 0..12 {
        engine.repay_next_installment(loan.id).unwrap();
    }
    let closed = engine.loan(loan.id).unwrap();
    assert_eq!(closed.status, LoanStatus::Closed);
    assert_eq!(closed.paid_periods, 12);

    // 4. Interest over the life of the loan is 78
    let repaid: i64 = engine
        .transactions_for_account(account)
        .iter()
        .filter(|tx| tx.kind == TransactionKind::LoanRepayment)
        .map(|tx| tx.amount.value())
        .sum();
    assert_eq!(repaid, 1278);
    assert_eq!(engine.account(account).unwrap().balance.value(), 22);

    // 5. Nothing further to collect
    let err = engine.repay_next_installment(loan.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateConflict);
}

/// Test: freezing halts deposits, withdrawals, transfers and loans.
#[test]
fn test_frozen_account_gates_every_operation() {
    let engine = BankEngine::new();
    let alice = engine.create_account(UserId::new(1)).id;
    let bob = engine.create_account(UserId::new(2)).id;
    engine.deposit(alice, 500).unwrap();
    engine.deposit(bob, 500).unwrap();
    let card = engine.issue_card(alice, None).unwrap().id;

    engine.freeze_account(alice).unwrap();
    assert_eq!(engine.deposit(alice, 10).unwrap_err().kind(), ErrorKind::StateConflict);
    assert_eq!(
        engine.transfer(alice, bob, 10).unwrap_err().kind(),
        ErrorKind::StateConflict
    );
    // credits into a frozen account are refused too
    assert_eq!(
        engine.transfer(bob, alice, 10).unwrap_err().kind(),
        ErrorKind::StateConflict
    );
    assert_eq!(
        engine.authorize_card_payment(card, 10).unwrap_err().kind(),
        ErrorKind::StateConflict
    );
    assert_eq!(
        engine.apply_loan(alice, 1000, dec!(5), 12).unwrap_err().kind(),
        ErrorKind::StateConflict
    );

    // everything springs back after unfreezing
    engine.unfreeze_account(alice).unwrap();
    engine.deposit(alice, 10).unwrap();
    engine.transfer(alice, bob, 10).unwrap();
    engine.authorize_card_payment(card, 10).unwrap();
    assert_eq!(engine.account(alice).unwrap().balance.value(), 490);
}

/// Test: one account's history stays in mutation order under contention.
#[test]
fn test_history_stays_chronological_per_account() {
    let engine = BankEngine::new();
    let account = engine.create_account(UserId::new(1)).id;

    thread::scope(|scope| {
        for _ in 0..4 {
            let engine = &engine;
            scope.spawn(move || {
                for _ in 0..25 {
                    engine.deposit(account, 1).unwrap();
                }
            });
        }
    });

    let history = engine.transactions_for_account(account);
    assert_eq!(history.len(), 100);
    // id order equals balance order: each deposit of 1 raised the balance
    // by exactly one, so the recorded snapshots must read 1..=100
    for (i, window) in history.windows(2).enumerate() {
        assert!(window[0].id < window[1].id, "ids out of order at {i}");
    }
    let balances: Vec<i64> = history
        .iter()
        .map(|tx| tx.destination_balance.unwrap().value())
        .collect();
    assert_eq!(balances, (1..=100).collect::<Vec<i64>>());
}

/// Test: closed accounts refuse everything, permanently.
#[test]
fn test_closed_account_is_terminal() {
    let engine = BankEngine::new();
    let account = engine.create_account(UserId::new(1)).id;
    engine.deposit(account, 100).unwrap();
    engine.close_account(account).unwrap();

    assert_eq!(engine.deposit(account, 10).unwrap_err().kind(), ErrorKind::StateConflict);
    assert_eq!(
        engine.unfreeze_account(account).unwrap_err().kind(),
        ErrorKind::StateConflict
    );
    assert_eq!(
        engine.freeze_account(account).unwrap_err().kind(),
        ErrorKind::StateConflict
    );
    // history survives closure
    assert_eq!(engine.transactions_for_account(account).len(), 1);
}
