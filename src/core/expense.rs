//! Expense records: a charge paid by one user and split across several.

use crate::core::currency::CurrencyCode;
use crate::core::money::MinorUnits;
use crate::core::user::{GroupId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One participant's share of an expense, in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub user: UserId,
    pub owed: MinorUnits,
}

impl SplitRecord {
    pub fn new(user: UserId, owed: MinorUnits) -> Self {
        Self { user, owed }
    }
}

/// A recorded expense: `payer` fronted `amount` of `currency`, and each
/// split names how much of it a participant owes back.
///
/// Splits are the authoritative source for balance computation; `amount`
/// is the charged total as entered. Constructors never validate, so a
/// record can carry corrupt data (negative shares, malformed currency)
/// all the way to the extractor, which is where violations are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    id: Uuid,
    group: Option<GroupId>,
    payer: UserId,
    currency: CurrencyCode,
    amount: MinorUnits,
    splits: Vec<SplitRecord>,
    created_at: DateTime<Utc>,
    description: Option<String>,
}

impl ExpenseRecord {
    /// Creates an expense with a random id and the current timestamp.
    pub fn new(
        group: Option<GroupId>,
        payer: UserId,
        currency: CurrencyCode,
        amount: MinorUnits,
        splits: Vec<SplitRecord>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            payer,
            currency,
            amount,
            splits,
            created_at: Utc::now(),
            description: None,
        }
    }

    /// Creates an expense with a fixed id and timestamp (useful for tests
    /// and replays).
    pub fn with_id(
        id: Uuid,
        group: Option<GroupId>,
        payer: UserId,
        currency: CurrencyCode,
        amount: MinorUnits,
        splits: Vec<SplitRecord>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group,
            payer,
            currency,
            amount,
            splits,
            created_at,
            description: None,
        }
    }

    /// Attaches a human-readable description.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group(&self) -> Option<&GroupId> {
        self.group.as_ref()
    }

    pub fn payer(&self) -> &UserId {
        &self.payer
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    pub fn splits(&self) -> &[SplitRecord] {
        &self.splits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} paid {} {} split {} ways",
            self.payer,
            self.amount,
            self.currency,
            self.splits.len()
        )
    }
}

/// Splits `amount` evenly across `participants`, largest-remainder style:
/// every participant gets the floor share and the first `remainder`
/// participants (in the given order) get one extra minor unit, so the
/// shares always sum back to `amount` exactly.
pub fn split_evenly(amount: MinorUnits, participants: &[UserId]) -> Vec<SplitRecord> {
    if participants.is_empty() {
        return Vec::new();
    }
    let n = participants.len() as i64;
    let base = amount.value().div_euclid(n);
    let remainder = amount.value().rem_euclid(n);
    participants
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let extra = if (i as i64) < remainder { 1 } else { 0 };
            SplitRecord::new(user.clone(), MinorUnits::new(base + extra))
        })
        .collect()
}
