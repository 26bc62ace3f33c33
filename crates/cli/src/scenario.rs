//! Demo and scripted scenarios against a fresh engine
//!
//! A script is JSON lines: one operation object per line, executed in
//! order against a single engine. Failing or unreadable operations are
//! reported and the run continues, so a script doubles as a reproduction
//! recipe for error paths. Decimal rates are written as strings
//! (`"rate": "12.5"`).

use std::fs;
use std::path::Path;

use anyhow::Context;
use corebank_engine::{
    AccountId, AccountStatus, Balance, BankEngine, CardId, EngineError, LoanId, UserId,
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Op {
    CreateAccount {
        owner: u64,
    },
    Deposit {
        account: u64,
        amount: i64,
    },
    Transfer {
        from: u64,
        to: u64,
        amount: i64,
    },
    IssueCard {
        account: u64,
        #[serde(default)]
        limit: Option<i64>,
    },
    CardPayment {
        card: u64,
        amount: i64,
    },
    ApplyLoan {
        account: u64,
        principal: i64,
        rate: Decimal,
        term: u32,
    },
    Repay {
        loan: u64,
    },
    SetAccountStatus {
        account: u64,
        status: String,
    },
    BlockCard {
        card: u64,
    },
    Summary {
        user: u64,
    },
}

/// Run the built-in end-to-end scenario and print the final report.
pub fn run_demo() {
    let engine = BankEngine::new();
    for op in demo_ops() {
        execute(&engine, op);
    }
    print_report(&engine);
}

/// Execute a JSON-lines script against a fresh engine. Blank lines and
/// `#` comments are skipped.
pub fn run_script(path: &Path) -> anyhow::Result<()> {
    let script = fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let engine = BankEngine::new();
    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<Op>(line) {
            Ok(op) => execute(&engine, op),
            Err(err) => println!("❌ Line {}: unreadable operation: {err}", index + 1),
        }
    }
    print_report(&engine);
    Ok(())
}

fn execute(engine: &BankEngine, op: Op) {
    match op {
        Op::CreateAccount { owner } => {
            let account = engine.create_account(UserId::new(owner));
            println!("✅ Created {} for {}", account.id, account.owner);
        }

        Op::Deposit { account, amount } => {
            let account = AccountId::new(account);
            match engine.deposit(account, amount) {
                Ok(tx) => println!(
                    "✅ Deposited {} into {} (txn: {}, balance: {})",
                    tx.amount,
                    account,
                    tx.id,
                    shown(tx.destination_balance)
                ),
                Err(err) => fail("Deposit", &err),
            }
        }

        Op::Transfer { from, to, amount } => {
            let (from, to) = (AccountId::new(from), AccountId::new(to));
            match engine.transfer(from, to, amount) {
                Ok(tx) => println!(
                    "✅ Transferred {} from {} to {} (txn: {})",
                    tx.amount, from, to, tx.id
                ),
                Err(err) => fail("Transfer", &err),
            }
        }

        Op::IssueCard { account, limit } => {
            let account = AccountId::new(account);
            match engine.issue_card(account, limit) {
                Ok(card) => match card.spend_limit {
                    Some(limit) => println!(
                        "✅ Issued {} ({}) for {}, per-payment limit {}",
                        card.id, card.number, account, limit
                    ),
                    None => println!(
                        "✅ Issued {} ({}) for {}, no spend limit",
                        card.id, card.number, account
                    ),
                },
                Err(err) => fail("Card issuance", &err),
            }
        }

        Op::CardPayment { card, amount } => {
            let card = CardId::new(card);
            match engine.authorize_card_payment(card, amount) {
                Ok(tx) => println!(
                    "✅ {} charged {} (txn: {}, balance: {})",
                    card,
                    tx.amount,
                    tx.id,
                    shown(tx.source_balance)
                ),
                Err(err) => fail("Card payment", &err),
            }
        }

        Op::ApplyLoan {
            account,
            principal,
            rate,
            term,
        } => {
            let account = AccountId::new(account);
            match engine.apply_loan(account, principal, rate, term) {
                Ok(loan) => {
                    println!(
                        "✅ {} disbursed: {} to {} over {} months at {}%",
                        loan.id, loan.principal, account, loan.term_months, loan.annual_rate_percent
                    );
                    println!(
                        "   {:<7} {:>10} {:>10} {:>10}",
                        "PERIOD", "PRINCIPAL", "INTEREST", "REMAINING"
                    );
                    for row in &loan.schedule {
                        println!(
                            "   {:<7} {:>10} {:>10} {:>10}",
                            row.period, row.principal, row.interest, row.remaining
                        );
                    }
                }
                Err(err) => fail("Loan application", &err),
            }
        }

        Op::Repay { loan } => {
            let loan = LoanId::new(loan);
            match engine.repay_next_installment(loan) {
                Ok(tx) => println!(
                    "✅ Collected {} on {} (txn: {}, balance: {})",
                    tx.amount,
                    loan,
                    tx.id,
                    shown(tx.source_balance)
                ),
                Err(err) => fail("Repayment", &err),
            }
        }

        Op::SetAccountStatus { account, status } => {
            let account = AccountId::new(account);
            let result = match status.parse::<AccountStatus>() {
                Ok(AccountStatus::Frozen) => engine.freeze_account(account),
                Ok(AccountStatus::Active) => engine.unfreeze_account(account),
                Ok(AccountStatus::Closed) => engine.close_account(account),
                Err(_) => {
                    println!("❌ Unknown account status: {status}");
                    return;
                }
            };
            match result {
                Ok(()) => println!("✅ {account} is now {status}"),
                Err(err) => fail("Status change", &err),
            }
        }

        Op::BlockCard { card } => {
            let card = CardId::new(card);
            match engine.block_card(card) {
                Ok(()) => println!("✅ {card} blocked"),
                Err(err) => fail("Card block", &err),
            }
        }

        Op::Summary { user } => {
            let summary = engine.financial_summary(UserId::new(user));
            println!(
                "Summary for {}: in {}, out {}",
                summary.user, summary.total_in, summary.total_out
            );
            for entry in &summary.accounts {
                println!("  {:<10} {:>14}", entry.account.to_string(), entry.balance.value());
            }
        }
    }
}

fn fail(action: &str, err: &EngineError) {
    println!("❌ {action} failed: {err} [{}]", err.kind());
}

fn shown(balance: Option<Balance>) -> i64 {
    balance.map(|b| b.value()).unwrap_or_default()
}

fn print_report(engine: &BankEngine) {
    let accounts = engine.all_accounts();
    println!();
    println!("Final state ({} accounts):", accounts.len());
    println!("{:-<50}", "");
    println!("{:<10} {:<10} {:>14}  {:<8}", "ACCOUNT", "OWNER", "BALANCE", "STATUS");
    for account in &accounts {
        println!(
            "{:<10} {:<10} {:>14}  {:<8}",
            account.id.to_string(),
            account.owner.to_string(),
            account.balance.value(),
            account.status.to_string()
        );
    }
}

fn demo_ops() -> Vec<Op> {
    vec![
        Op::CreateAccount { owner: 1 },
        Op::CreateAccount { owner: 1 },
        Op::CreateAccount { owner: 2 },
        Op::Deposit {
            account: 1,
            amount: 100_000,
        },
        Op::Transfer {
            from: 1,
            to: 2,
            amount: 25_000,
        },
        Op::Transfer {
            from: 1,
            to: 3,
            amount: 10_000,
        },
        Op::IssueCard {
            account: 1,
            limit: Some(20_000),
        },
        Op::CardPayment {
            card: 1,
            amount: 4_500,
        },
        // declined: over the per-payment limit
        Op::CardPayment {
            card: 1,
            amount: 30_000,
        },
        Op::ApplyLoan {
            account: 3,
            principal: 1200,
            rate: Decimal::from(12),
            term: 12,
        },
        Op::Repay { loan: 1 },
        Op::Repay { loan: 1 },
        Op::SetAccountStatus {
            account: 2,
            status: "frozen".into(),
        },
        // declined: the account was just frozen
        Op::Deposit {
            account: 2,
            amount: 50,
        },
        Op::SetAccountStatus {
            account: 2,
            status: "active".into(),
        },
        Op::BlockCard { card: 1 },
        // declined: the card was just blocked
        Op::CardPayment {
            card: 1,
            amount: 100,
        },
        Op::Summary { user: 1 },
        Op::Summary { user: 2 },
    ]
}
