//! Balance aggregation.
//!
//! Folds normalized ledger entries into two views that downstream code
//! reads directly:
//!
//! - pairwise balances, stored once per unordered user pair and currency
//!   so the two directions can never disagree;
//! - net positions per user and currency, the input to debt
//!   simplification.
//!
//! All arithmetic is checked integer addition in minor units. Overflow
//! is a data-integrity failure, never a silent wrap.

use crate::core::currency::CurrencyCode;
use crate::core::entry::LedgerEntry;
use crate::core::error::{LedgerError, Result};
use crate::core::money::MinorUnits;
use crate::core::user::UserId;
use std::collections::{BTreeMap, HashMap};

/// A nonzero pairwise balance read out in debtor → creditor direction.
/// `amount` is always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedDebt {
    pub debtor: UserId,
    pub creditor: UserId,
    pub currency: CurrencyCode,
    pub amount: MinorUnits,
}

/// Accumulated balances over a set of ledger entries.
///
/// Pairwise balances are keyed by the canonical pair (lexicographically
/// smaller id first); the stored value is signed as "second owes first",
/// so a negative value means the first id owes the second. Storing one
/// direction per pair makes antisymmetry structural: the reverse reading
/// is the negation of the same slot, not a second number that could
/// drift.
///
/// Net positions follow the usual sign convention: positive means the
/// user is owed overall (net creditor), negative means the user owes.
#[derive(Debug, Clone, Default)]
pub struct BalanceSheet {
    /// (first, second, currency) -> amount second owes first, first < second.
    pairs: HashMap<(UserId, UserId, CurrencyCode), MinorUnits>,
    /// (user, currency) -> net position.
    net: HashMap<(UserId, CurrencyCode), MinorUnits>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sheet by applying every entry in order. Order does not
    /// affect the result: integer addition is associative and
    /// commutative, so any permutation of the same entries yields the
    /// same sheet.
    pub fn from_entries(entries: &[LedgerEntry]) -> Result<Self> {
        let mut sheet = Self::new();
        for entry in entries {
            sheet.apply_entry(entry)?;
        }
        Ok(sheet)
    }

    /// Applies one entry: debtor's position falls, creditor's rises, and
    /// the canonical pair slot moves by the same amount.
    ///
    /// Self-entries (debtor == creditor) are no-ops and are dropped.
    pub fn apply_entry(&mut self, entry: &LedgerEntry) -> Result<()> {
        if entry.is_self_entry() {
            log::debug!("dropping self-entry for {}", entry.debtor());
            return Ok(());
        }

        let amount = entry.amount();
        let currency = entry.currency();

        // Canonical slot is "second owes first": a debt from the larger
        // id to the smaller adds, the reverse direction subtracts.
        let (first, second, signed) = if entry.debtor() < entry.creditor() {
            (entry.debtor().clone(), entry.creditor().clone(), -amount)
        } else {
            (entry.creditor().clone(), entry.debtor().clone(), amount)
        };
        let pair_slot = self
            .pairs
            .entry((first, second, currency.clone()))
            .or_insert(MinorUnits::ZERO);
        *pair_slot = pair_slot
            .checked_add(signed)
            .ok_or_else(|| Self::overflow(currency, amount))?;

        let debtor_slot = self
            .net
            .entry((entry.debtor().clone(), currency.clone()))
            .or_insert(MinorUnits::ZERO);
        *debtor_slot = debtor_slot
            .checked_sub(amount)
            .ok_or_else(|| Self::overflow(currency, amount))?;

        let creditor_slot = self
            .net
            .entry((entry.creditor().clone(), currency.clone()))
            .or_insert(MinorUnits::ZERO);
        *creditor_slot = creditor_slot
            .checked_add(amount)
            .ok_or_else(|| Self::overflow(currency, amount))?;

        Ok(())
    }

    fn overflow(currency: &CurrencyCode, amount: MinorUnits) -> LedgerError {
        log::error!("balance accumulator overflow applying {amount} {currency}");
        LedgerError::AmountOverflow {
            currency: currency.clone(),
            amount,
        }
    }

    /// Net balance between two users in one currency, read from `a`'s
    /// side: positive means `b` owes `a`, negative means `a` owes `b`.
    /// Always antisymmetric: `pair_balance(a, b, c) == -pair_balance(b, a, c)`.
    pub fn pair_balance(&self, a: &UserId, b: &UserId, currency: &CurrencyCode) -> MinorUnits {
        if a == b {
            return MinorUnits::ZERO;
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let stored = self
            .pairs
            .get(&(first.clone(), second.clone(), currency.clone()))
            .copied()
            .unwrap_or(MinorUnits::ZERO);
        // Stored value is "second owes first"; flip when reading from
        // the second id's side.
        if a < b {
            stored
        } else {
            -stored
        }
    }

    /// Net position of a user in one currency. Positive = owed overall.
    pub fn net_position(&self, user: &UserId, currency: &CurrencyCode) -> MinorUnits {
        self.net
            .get(&(user.clone(), currency.clone()))
            .copied()
            .unwrap_or(MinorUnits::ZERO)
    }

    /// One user's view of everyone they share a balance with: nonzero
    /// `(counterparty, currency, amount)` rows, positive when the
    /// counterparty owes `user`. Sorted by counterparty then currency.
    pub fn counterparty_balances(&self, user: &UserId) -> Vec<(UserId, CurrencyCode, MinorUnits)> {
        let mut rows = Vec::new();
        for ((first, second, currency), &stored) in &self.pairs {
            if stored.is_zero() {
                continue;
            }
            if first == user {
                rows.push((second.clone(), currency.clone(), stored));
            } else if second == user {
                rows.push((first.clone(), currency.clone(), -stored));
            }
        }
        rows.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        rows
    }

    /// Every nonzero pairwise balance, normalized to debtor → creditor
    /// direction with a positive amount. Sorted by debtor, creditor,
    /// currency for stable output.
    pub fn nonzero_pair_balances(&self) -> Vec<DirectedDebt> {
        let mut debts = Vec::new();
        for ((first, second, currency), &stored) in &self.pairs {
            if stored.is_zero() {
                continue;
            }
            let (debtor, creditor) = if stored.is_positive() {
                (second.clone(), first.clone())
            } else {
                (first.clone(), second.clone())
            };
            debts.push(DirectedDebt {
                debtor,
                creditor,
                currency: currency.clone(),
                amount: stored.abs(),
            });
        }
        debts.sort_by(|a, b| {
            (&a.debtor, &a.creditor, &a.currency).cmp(&(&b.debtor, &b.creditor, &b.currency))
        });
        debts
    }

    /// Nonzero net positions in one currency, keyed by user.
    pub fn net_positions_for(&self, currency: &CurrencyCode) -> BTreeMap<UserId, MinorUnits> {
        self.net
            .iter()
            .filter(|((_, c), amount)| c == currency && !amount.is_zero())
            .map(|((user, _), &amount)| (user.clone(), amount))
            .collect()
    }

    /// Every currency the sheet has seen, sorted and deduplicated.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut currencies: Vec<CurrencyCode> =
            self.net.keys().map(|(_, c)| c.clone()).collect();
        currencies.sort();
        currencies.dedup();
        currencies
    }

    /// Verifies conservation: net positions sum to zero per currency.
    /// Every entry moves equal and opposite amounts, so a nonzero sum
    /// means corruption. The check sums in i128 so it cannot itself
    /// overflow.
    pub fn is_conserved(&self) -> bool {
        let mut sums: HashMap<&CurrencyCode, i128> = HashMap::new();
        for ((_, currency), amount) in &self.net {
            *sums.entry(currency).or_insert(0) += amount.value() as i128;
        }
        sums.values().all(|&sum| sum == 0)
    }
}
