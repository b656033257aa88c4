//! Data source traits the engine reads through.
//!
//! The engine owns no storage. Each computation pulls a snapshot of
//! records through these traits, works on it, and returns; callers wire
//! in whatever backs them (a database, an API client, or the bundled
//! [`InMemoryLedger`]). A failing source surfaces as
//! [`LedgerError::Source`] and aborts the computation.
//!
//! [`InMemoryLedger`]: crate::scenario::InMemoryLedger
//! [`LedgerError::Source`]: crate::core::error::LedgerError::Source

use crate::core::error::Result;
use crate::core::expense::ExpenseRecord;
use crate::core::payment::PaymentRecord;
use crate::core::user::{GroupId, UserId};

/// Supplies expense records per scope.
pub trait ExpenseSource {
    /// Every expense recorded in the group.
    fn expenses_for_group(&self, group: &GroupId) -> Result<Vec<ExpenseRecord>>;

    /// Every expense the user touches, in or out of groups: expenses
    /// they paid plus expenses they hold a split in.
    fn expenses_for_user(&self, user: &UserId) -> Result<Vec<ExpenseRecord>>;
}

/// Supplies confirmed settlement payments per scope. Implementations
/// return confirmed payments only; pending and rejected records never
/// reach the engine through this trait.
pub trait PaymentSource {
    /// Confirmed payments recorded in the group.
    fn confirmed_payments_for_group(&self, group: &GroupId) -> Result<Vec<PaymentRecord>>;

    /// Confirmed payments the user sent or received.
    fn confirmed_payments_for_user(&self, user: &UserId) -> Result<Vec<PaymentRecord>>;
}

/// Answers group membership questions for access control.
pub trait MembershipSource {
    /// Whether `user` belongs to `group`. Unknown groups are simply
    /// groups the user does not belong to.
    fn is_member(&self, group: &GroupId, user: &UserId) -> Result<bool>;
}
