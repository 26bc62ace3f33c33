//! Loan record and amortization schedule entries

use chrono::{DateTime, Utc};
use corebank_core::{AccountId, Amount, LoanId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle of a loan. Closing is terminal and happens automatically
/// once every installment has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Closed,
}

/// One row of an amortization schedule.
///
/// # Invariant
/// `principal` and `interest` are non-negative, and `remaining` is the
/// principal still owed *after* this installment is paid. The final row
/// always has `remaining == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based period number.
    pub period: u32,
    pub due_date: DateTime<Utc>,
    /// Principal portion, in minor units.
    pub principal: i64,
    /// Interest portion, in minor units.
    pub interest: i64,
    /// Principal outstanding after this installment.
    pub remaining: i64,
}

impl Installment {
    /// Total amount collected for this installment.
    pub fn total(&self) -> i64 {
        self.principal + self.interest
    }
}

/// A fixed-payment loan disbursed to a single account.
///
/// The schedule is computed at origination and immutable afterwards;
/// repayment only advances `paid_periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub account_id: AccountId,
    pub principal: Amount,
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    pub created_at: DateTime<Utc>,
    pub status: LoanStatus,
    /// Number of installments already collected, counting from the
    /// start of the schedule.
    pub paid_periods: u32,
    pub schedule: Vec<Installment>,
}

impl Loan {
    pub(crate) fn new(
        id: LoanId,
        account_id: AccountId,
        principal: Amount,
        annual_rate_percent: Decimal,
        term_months: u32,
        created_at: DateTime<Utc>,
        schedule: Vec<Installment>,
    ) -> Self {
        Self {
            id,
            account_id,
            principal,
            annual_rate_percent,
            term_months,
            created_at,
            status: LoanStatus::Active,
            paid_periods: 0,
            schedule,
        }
    }

    /// The next unpaid installment, or `None` once the loan is closed.
    pub fn next_installment(&self) -> Option<&Installment> {
        if self.status == LoanStatus::Closed {
            return None;
        }
        self.schedule.get(self.paid_periods as usize)
    }

    /// Advance past the current installment, closing the loan when the
    /// last one is collected.
    pub fn mark_period_paid(&mut self) {
        self.paid_periods += 1;
        if self.paid_periods >= self.term_months {
            self.status = LoanStatus::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn amount(val: i64) -> Amount {
        Amount::new(val).unwrap()
    }

    fn sample_loan(term: u32) -> Loan {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let schedule = (1..=term)
            .map(|period| Installment {
                period,
                due_date: start,
                principal: 100,
                interest: 5,
                remaining: (term - period) as i64 * 100,
            })
            .collect();
        Loan::new(
            LoanId::new(1),
            AccountId::new(7),
            amount(term as i64 * 100),
            Decimal::from(6),
            term,
            start,
            schedule,
        )
    }

    #[test]
    fn test_new_loan_starts_active_with_nothing_paid() {
        let loan = sample_loan(3);
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.paid_periods, 0);
        assert_eq!(loan.next_installment().unwrap().period, 1);
    }

    #[test]
    fn test_marking_all_periods_closes_the_loan() {
        let mut loan = sample_loan(3);
        loan.mark_period_paid();
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.next_installment().unwrap().period, 2);

        loan.mark_period_paid();
        loan.mark_period_paid();
        assert_eq!(loan.status, LoanStatus::Closed);
        assert!(loan.next_installment().is_none());
    }

    #[test]
    fn test_installment_total_sums_both_portions() {
        let row = Installment {
            period: 1,
            due_date: Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap(),
            principal: 95,
            interest: 12,
            remaining: 1105,
        };
        assert_eq!(row.total(), 107);
    }

    #[test]
    fn test_loan_status_round_trips_through_strings() {
        assert_eq!(LoanStatus::Active.to_string(), "active");
        assert_eq!("closed".parse::<LoanStatus>().unwrap(), LoanStatus::Closed);
    }
}
