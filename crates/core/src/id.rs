//! Typed identifiers for every domain entity.
//!
//! Ids are plain `u64` values minted by the owning store. Wrapping them keeps
//! an `AccountId` from ever being passed where a `CardId` belongs, and the
//! derived `Ord` is what cross-account lock ordering keys on.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

define_id! {
    /// An account owner. Minted by the caller's identity layer and trusted as given.
    UserId, "USER"
}

define_id! {
    /// A bank account. Also the key the fine-grained mutation locks hang off.
    AccountId, "ACC"
}

define_id! {
    /// A debit card linked to one account.
    CardId, "CARD"
}

define_id! {
    /// A loan and its amortization schedule.
    LoanId, "LOAN"
}

define_id! {
    /// A ledger entry. Monotonically increasing in append order.
    TransactionId, "TXN"
}
