//! Settlement payment records and their status lifecycle.

use crate::core::currency::CurrencyCode;
use crate::core::money::MinorUnits;
use crate::core::user::{GroupId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle state of a settlement payment.
///
/// Only [`Confirmed`] payments move balances; a pending payment is an
/// intent and a rejected one never happened. Both `Confirmed` and
/// `Rejected` are terminal.
///
/// [`Confirmed`]: PaymentStatus::Confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl PaymentStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, PaymentStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Confirmed | PaymentStatus::Rejected)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Confirmed => "CONFIRMED",
            PaymentStatus::Rejected => "REJECTED",
        };
        write!(f, "{label}")
    }
}

/// Raised on an invalid status transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentStateError {
    #[error("payment {payment} is already {status}, cannot transition")]
    AlreadyTerminal { payment: Uuid, status: PaymentStatus },
}

/// A settlement payment: `from` paid `to` directly to reduce their debt.
///
/// Like expenses, payment records carry whatever data they were given;
/// validation happens in the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    id: Uuid,
    group: Option<GroupId>,
    from: UserId,
    to: UserId,
    currency: CurrencyCode,
    amount: MinorUnits,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Creates a pending payment with a random id and the current timestamp.
    pub fn new(
        group: Option<GroupId>,
        from: UserId,
        to: UserId,
        currency: CurrencyCode,
        amount: MinorUnits,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            from,
            to,
            currency,
            amount,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Creates a payment already in the confirmed state.
    pub fn confirmed(
        group: Option<GroupId>,
        from: UserId,
        to: UserId,
        currency: CurrencyCode,
        amount: MinorUnits,
    ) -> Self {
        let mut payment = Self::new(group, from, to, currency, amount);
        payment.status = PaymentStatus::Confirmed;
        payment
    }

    /// Creates a payment with a fixed id, status, and timestamp (useful
    /// for tests and replays).
    #[allow(clippy::too_many_arguments)]
    pub fn with_id(
        id: Uuid,
        group: Option<GroupId>,
        from: UserId,
        to: UserId,
        currency: CurrencyCode,
        amount: MinorUnits,
        status: PaymentStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group,
            from,
            to,
            currency,
            amount,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group(&self) -> Option<&GroupId> {
        self.group.as_ref()
    }

    pub fn from(&self) -> &UserId {
        &self.from
    }

    pub fn to(&self) -> &UserId {
        &self.to
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the payment confirmed. Fails if it already reached a
    /// terminal state.
    pub fn confirm(&mut self) -> std::result::Result<(), PaymentStateError> {
        if self.status.is_terminal() {
            return Err(PaymentStateError::AlreadyTerminal {
                payment: self.id,
                status: self.status,
            });
        }
        self.status = PaymentStatus::Confirmed;
        Ok(())
    }

    /// Marks the payment rejected. Fails if it already reached a
    /// terminal state.
    pub fn reject(&mut self) -> std::result::Result<(), PaymentStateError> {
        if self.status.is_terminal() {
            return Err(PaymentStateError::AlreadyTerminal {
                payment: self.id,
                status: self.status,
            });
        }
        self.status = PaymentStatus::Rejected;
        Ok(())
    }
}

impl fmt::Display for PaymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} {} {} [{}]",
            self.from, self.to, self.amount, self.currency, self.status
        )
    }
}
