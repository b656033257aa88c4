use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a user participating in shared expenses.
///
/// A user can appear as an expense payer, a split participant, or a
/// payment counterparty. Identifiers are opaque to the engine; ordering
/// (lexicographic) is used only for canonicalization and deterministic
/// output.
///
/// # Examples
///
/// ```
/// use split_ledger::core::user::UserId;
///
/// let alice = UserId::new("alice");
/// let bob = UserId::new("bob");
/// assert_ne!(alice, bob);
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this user ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for an expense group.
///
/// Group-scoped queries (balances, debt simplification) are keyed by this
/// identifier; expenses and payments outside any group carry no `GroupId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Create a new group identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this group ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_equality() {
        let a = UserId::new("alice");
        let b = UserId::new("alice");
        let c = UserId::new("bob");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_user_display() {
        let u = UserId::new("carol");
        assert_eq!(format!("{}", u), "carol");
    }

    #[test]
    fn test_user_ordering() {
        let a = UserId::new("alice");
        let b = UserId::new("bob");
        assert!(a < b);
    }

    #[test]
    fn test_group_roundtrip() {
        let g = GroupId::new("ski-trip-2024");
        assert_eq!(g.as_str(), "ski-trip-2024");
        assert_eq!(GroupId::from("ski-trip-2024"), g);
    }
}
