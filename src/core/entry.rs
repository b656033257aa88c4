//! Normalized ledger entries.
//!
//! A [`LedgerEntry`] is the single currency-scoped fact every balance is
//! built from: "debtor owes creditor this many minor units". Expenses
//! and payments are both translated into entries before aggregation, so
//! downstream code never needs to know which kind of record produced a
//! debt.

use crate::core::currency::CurrencyCode;
use crate::core::money::MinorUnits;
use crate::core::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed debt: `debtor` owes `creditor` `amount` of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    debtor: UserId,
    creditor: UserId,
    currency: CurrencyCode,
    amount: MinorUnits,
}

impl LedgerEntry {
    pub fn new(debtor: UserId, creditor: UserId, currency: CurrencyCode, amount: MinorUnits) -> Self {
        Self {
            debtor,
            creditor,
            currency,
            amount,
        }
    }

    pub fn debtor(&self) -> &UserId {
        &self.debtor
    }

    pub fn creditor(&self) -> &UserId {
        &self.creditor
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    /// True when debtor and creditor are the same user. Self-entries are
    /// no-ops and the aggregator skips them.
    pub fn is_self_entry(&self) -> bool {
        self.debtor == self.creditor
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} owes {} {} {}",
            self.debtor, self.creditor, self.amount, self.currency
        )
    }
}
