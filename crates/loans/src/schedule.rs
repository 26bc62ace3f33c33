//! Fixed-payment amortization
//!
//! Schedules use the annuity formula `payment = P * r * (1 + r)^n / ((1 + r)^n - 1)`
//! with `r` the monthly rate derived from an annual percentage. All cent
//! amounts are rounded half-away-from-zero, and the final installment
//! absorbs whatever rounding drift accumulated, so the principal portions
//! always sum exactly to the amount borrowed.

use chrono::{DateTime, Months, Utc};
use corebank_core::Amount;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use crate::error::LoanError;
use crate::loan::Installment;

/// Upper bound on loan terms (50 years).
pub const MAX_TERM_MONTHS: u32 = 600;

const PERCENT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Convert an annual percentage rate into a monthly fraction.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR
}

/// Compute the full amortization schedule for a loan.
///
/// Due dates fall one calendar month apart starting one month after
/// `start`, clamped to the end of shorter months.
pub fn build_schedule(
    principal: Amount,
    annual_rate_percent: Decimal,
    term_months: u32,
    start: DateTime<Utc>,
) -> Result<Vec<Installment>, LoanError> {
    if annual_rate_percent.is_sign_negative() {
        return Err(LoanError::invalid_terms("annual rate must not be negative"));
    }
    if term_months == 0 {
        return Err(LoanError::invalid_terms("term must be at least one month"));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(LoanError::invalid_terms(format!(
            "term must not exceed {MAX_TERM_MONTHS} months"
        )));
    }

    let rate = monthly_rate(annual_rate_percent);
    let payment = if rate.is_zero() {
        (principal.value() / i64::from(term_months)).max(1)
    } else {
        fixed_payment(principal, rate, term_months)?
    };

    let mut remaining = principal.value();
    let mut schedule = Vec::with_capacity(term_months as usize);
    for period in 1..=term_months {
        let interest = if rate.is_zero() {
            0
        } else {
            let accrued = Decimal::from(remaining)
                .checked_mul(rate)
                .ok_or_else(numeric_overflow)?;
            to_minor_units(accrued)?
        };
        let principal_portion = if period == term_months {
            remaining
        } else {
            (payment - interest).clamp(0, remaining)
        };
        remaining -= principal_portion;

        let due_date = start
            .checked_add_months(Months::new(period))
            .ok_or_else(|| LoanError::invalid_terms("due date overflows the calendar"))?;
        schedule.push(Installment {
            period,
            due_date,
            principal: principal_portion,
            interest,
            remaining,
        });
    }
    Ok(schedule)
}

/// The level payment per period, rounded to minor units. Clamped to at
/// least one unit so tiny loans still amortize.
fn fixed_payment(principal: Amount, rate: Decimal, term_months: u32) -> Result<i64, LoanError> {
    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(term_months))
        .ok_or_else(numeric_overflow)?;
    let payment = Decimal::from(principal.value())
        .checked_mul(rate)
        .and_then(|value| value.checked_mul(factor))
        .and_then(|value| value.checked_div(factor - Decimal::ONE))
        .ok_or_else(numeric_overflow)?;
    Ok(to_minor_units(payment)?.max(1))
}

fn to_minor_units(value: Decimal) -> Result<i64, LoanError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(numeric_overflow)
}

fn numeric_overflow() -> LoanError {
    LoanError::invalid_terms("schedule arithmetic overflowed")
}
