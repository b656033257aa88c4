use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Signed monetary amount in integer minor units (cents, satang, fils…).
///
/// Every amount inside the engine is a `MinorUnits` value. Integer
/// arithmetic keeps aggregation associative and commutative, so the same
/// entry set in any order folds to bit-identical sums; conversion to a
/// display decimal happens only at the serialization boundary (see
/// [`CurrencyCode::to_decimal`]).
///
/// The sign convention depends on context: ledger entry amounts are
/// non-negative, pair balances and net positions are signed (positive =
/// owed, negative = owing).
///
/// [`CurrencyCode::to_decimal`]: crate::core::currency::CurrencyCode::to_decimal
///
/// # Examples
///
/// ```
/// use split_ledger::core::money::MinorUnits;
///
/// let owed = MinorUnits::new(12_34);
/// assert_eq!(owed.value(), 1234);
/// assert!(owed.is_positive());
/// assert_eq!(owed - owed, MinorUnits::ZERO);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub const ZERO: MinorUnits = MinorUnits(0);

    /// Creates an amount from raw minor units.
    pub const fn new(units: i64) -> Self {
        Self(units)
    }

    /// Returns the raw minor-unit value.
    pub const fn value(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Checked addition; `None` on i64 overflow.
    ///
    /// The balance aggregator uses this rather than plain `+` so that an
    /// overflow surfaces as a loud integrity error instead of a silently
    /// wrapped balance.
    pub fn checked_add(self, rhs: MinorUnits) -> Option<MinorUnits> {
        self.0.checked_add(rhs.0).map(MinorUnits)
    }

    /// Checked subtraction; `None` on i64 overflow.
    pub fn checked_sub(self, rhs: MinorUnits) -> Option<MinorUnits> {
        self.0.checked_sub(rhs.0).map(MinorUnits)
    }

    /// The smaller of two amounts.
    pub fn min(self, rhs: MinorUnits) -> MinorUnits {
        MinorUnits(self.0.min(rhs.0))
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MinorUnits> for i64 {
    fn from(value: MinorUnits) -> Self {
        value.0
    }
}

impl Add for MinorUnits {
    type Output = MinorUnits;

    fn add(self, rhs: MinorUnits) -> MinorUnits {
        MinorUnits(self.0 + rhs.0)
    }
}

impl AddAssign for MinorUnits {
    fn add_assign(&mut self, rhs: MinorUnits) {
        self.0 += rhs.0;
    }
}

impl Sub for MinorUnits {
    type Output = MinorUnits;

    fn sub(self, rhs: MinorUnits) -> MinorUnits {
        MinorUnits(self.0 - rhs.0)
    }
}

impl SubAssign for MinorUnits {
    fn sub_assign(&mut self, rhs: MinorUnits) {
        self.0 -= rhs.0;
    }
}

impl Neg for MinorUnits {
    type Output = MinorUnits;

    fn neg(self) -> MinorUnits {
        MinorUnits(-self.0)
    }
}

impl Sum for MinorUnits {
    fn sum<I: Iterator<Item = MinorUnits>>(iter: I) -> MinorUnits {
        iter.fold(MinorUnits::ZERO, |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = MinorUnits::new(30_00);
        let b = MinorUnits::new(12_50);
        assert_eq!((a + b).value(), 4250);
        assert_eq!((a - b).value(), 1750);
        assert_eq!((-a).value(), -3000);
    }

    #[test]
    fn test_sign_predicates() {
        assert!(MinorUnits::new(1).is_positive());
        assert!(MinorUnits::new(-1).is_negative());
        assert!(MinorUnits::ZERO.is_zero());
        assert_eq!(MinorUnits::new(-42).abs().value(), 42);
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = MinorUnits::new(i64::MAX);
        assert!(max.checked_add(MinorUnits::new(1)).is_none());
        assert_eq!(
            max.checked_add(MinorUnits::ZERO),
            Some(MinorUnits::new(i64::MAX))
        );
    }

    #[test]
    fn test_sum_over_iterator() {
        let total: MinorUnits = [10, 20, -5].into_iter().map(MinorUnits::new).sum();
        assert_eq!(total.value(), 25);
    }
}
