//! Debit cards and card number generation.

use chrono::{DateTime, Utc};
use corebank_core::{AccountId, Amount, CardId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Issuer identification prefix of every generated card number.
const ISSUER_PREFIX: &str = "4402";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Active,
    Blocked,
}

/// A debit card linked to one account.
///
/// The card number is display and lookup data only; authorization goes by
/// card id. `spend_limit` caps a single authorization, not a running total,
/// and is fixed at issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub account_id: AccountId,
    pub number: String,
    pub status: CardStatus,
    pub spend_limit: Option<Amount>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub(crate) fn new(
        id: CardId,
        account_id: AccountId,
        spend_limit: Option<Amount>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            number: card_number(id),
            status: CardStatus::Active,
            spend_limit,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CardStatus::Active
    }
}

/// Derive the 16-digit card number for a card id: issuer prefix, zero-padded
/// id, Luhn check digit.
pub(crate) fn card_number(id: CardId) -> String {
    let payload = format!("{ISSUER_PREFIX}{:011}", id.value());
    let check = luhn_check_digit(&payload);
    format!("{payload}{check}")
}

/// Standard Luhn check digit over a payload of ASCII digits. The rightmost
/// payload digit is doubled first, since the check digit will sit to its
/// right.
fn luhn_check_digit(payload: &str) -> u32 {
    let sum: u32 = payload
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, digit)| {
            if i % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();
    (10 - sum % 10) % 10
}
