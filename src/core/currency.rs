use crate::core::money::MinorUnits;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// The engine never converts between currencies — every computation is
/// partitioned by code — so all a code contributes is identity plus its
/// minor-unit exponent (how many fractional digits one display unit
/// carries: 2 for USD cents, 0 for JPY, 3 for KWD fils).
///
/// # Examples
///
/// ```
/// use split_ledger::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let jpy = CurrencyCode::new("JPY");
/// assert_ne!(usd, jpy);
/// assert_eq!(usd.exponent(), 2);
/// assert_eq!(jpy.exponent(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code has the ISO 4217 shape: exactly three ASCII
    /// uppercase letters. Shape only — the engine does not keep a full
    /// registry, and custom settlement units are allowed upstream.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }

    /// Minor-unit exponent per ISO 4217. Unlisted codes default to 2.
    pub fn exponent(&self) -> u32 {
        match self.0.as_str() {
            "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF"
            | "UGX" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
            "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
            _ => 2,
        }
    }

    /// Render a minor-unit amount as an exact display decimal.
    ///
    /// This is the only sanctioned path from internal integer arithmetic
    /// to the decimal values that cross the engine boundary.
    pub fn to_decimal(&self, amount: MinorUnits) -> Decimal {
        Decimal::new(amount.value(), self.exponent())
    }

    /// Parse an exact display decimal into minor units.
    ///
    /// Fails if the value carries more fractional digits than this
    /// currency's exponent (`12.345` USD) or does not fit in an `i64`
    /// minor-unit amount.
    pub fn minor_units(&self, value: Decimal) -> Result<MinorUnits, AmountError> {
        let exponent = self.exponent();
        let normalized = value.normalize();
        if normalized.scale() > exponent {
            return Err(AmountError::TooPrecise {
                value,
                currency: self.clone(),
            });
        }
        let shift = exponent - normalized.scale();
        let scaled = normalized
            .mantissa()
            .checked_mul(10_i128.pow(shift))
            .ok_or(AmountError::OutOfRange { value })?;
        i64::try_from(scaled)
            .map(MinorUnits::new)
            .map_err(|_| AmountError::OutOfRange { value })
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from decimal ↔ minor-unit conversion.
#[derive(Debug, Error)]
pub enum AmountError {
    #[error("amount {value} has more fractional digits than {currency} allows")]
    TooPrecise {
        value: Decimal,
        currency: CurrencyCode,
    },
    #[error("amount {value} does not fit in a minor-unit amount")]
    OutOfRange { value: Decimal },
}
