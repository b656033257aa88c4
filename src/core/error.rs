//! Engine error taxonomy.
//!
//! Two kinds of failure leave the engine:
//!
//! - [`AccessDenied`] — the requester is not a member of the group scope.
//!   Ordinary control flow, surfaced to callers as an authorization
//!   failure, never retried.
//! - Data-integrity violations (negative split, malformed currency,
//!   broken conservation, overflow) — upstream corruption the engine
//!   refuses to paper over. Logged and surfaced, never swallowed.
//!
//! "Not found" is deliberately absent: a group or user with no data in
//! scope is an ordinary empty result, so the common "new group, no
//! expenses yet" case costs callers nothing.
//!
//! [`AccessDenied`]: LedgerError::AccessDenied

use crate::core::currency::CurrencyCode;
use crate::core::money::MinorUnits;
use crate::core::user::{GroupId, UserId};
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors produced by the balance and settlement engine.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("access denied: {user} is not a member of group {group}")]
    AccessDenied { user: UserId, group: GroupId },

    #[error("negative split of {amount} minor units for {user} in expense {expense}")]
    NegativeSplit {
        expense: Uuid,
        user: UserId,
        amount: MinorUnits,
    },

    #[error("payment {payment} from {from} to {to} has negative amount {amount} minor units")]
    NegativePayment {
        payment: Uuid,
        from: UserId,
        to: UserId,
        amount: MinorUnits,
    },

    #[error("malformed currency code {code:?} on record {record}")]
    MalformedCurrency { record: Uuid, code: String },

    #[error("net positions in {currency} sum to {residual} minor units, expected zero")]
    ConservationBroken {
        currency: CurrencyCode,
        residual: MinorUnits,
    },

    #[error("lone nonzero net position: {user} holds {amount} minor units of {currency}")]
    LoneNetPosition {
        user: UserId,
        currency: CurrencyCode,
        amount: MinorUnits,
    },

    #[error("balance accumulator overflow while applying {amount} minor units of {currency}")]
    AmountOverflow {
        currency: CurrencyCode,
        amount: MinorUnits,
    },

    #[error("source error: {0}")]
    Source(String),
}

impl LedgerError {
    /// Whether this error reports corrupted input data (as opposed to an
    /// authorization or collaborator failure). Integrity errors indicate
    /// a bug or corruption upstream and are worth alerting on.
    pub fn is_data_integrity(&self) -> bool {
        !matches!(
            self,
            LedgerError::AccessDenied { .. } | LedgerError::Source(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let denied = LedgerError::AccessDenied {
            user: UserId::new("mallory"),
            group: GroupId::new("trip"),
        };
        assert!(!denied.is_data_integrity());

        let broken = LedgerError::ConservationBroken {
            currency: CurrencyCode::new("USD"),
            residual: MinorUnits::new(1),
        };
        assert!(broken.is_data_integrity());
    }

    #[test]
    fn test_display_mentions_actors() {
        let err = LedgerError::AccessDenied {
            user: UserId::new("mallory"),
            group: GroupId::new("trip"),
        };
        let text = err.to_string();
        assert!(text.contains("mallory"));
        assert!(text.contains("trip"));
    }
}
