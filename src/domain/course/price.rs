//! Price value object.
//!
//! Prices are stored as integer cents to avoid floating point drift; the
//! HTTP layer converts from/to major units (e.g. `99.90`), and the payment
//! gateway consumes the minor-unit value directly.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Non-negative course price in integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Creates a price from integer cents.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::out_of_range(
                "price_cents",
                0,
                i64::MAX,
                cents,
            ));
        }
        Ok(Self(cents))
    }

    /// Creates a price from a major-unit amount (e.g. `99.90`).
    ///
    /// Rejects negative, NaN and non-finite values; rounds to the nearest
    /// cent.
    pub fn from_major_units(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::invalid_format(
                "price",
                "must be a finite number",
            ));
        }
        if amount < 0.0 {
            return Err(ValidationError::invalid_format(
                "price",
                "must be non-negative",
            ));
        }
        Ok(Self((amount * 100.0).round() as i64))
    }

    /// The amount in minor units (cents), as payment providers expect.
    pub fn as_minor_units(&self) -> i64 {
        self.0
    }

    /// The amount in major units for display and API responses.
    pub fn as_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_free(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_major_units_rounds_to_cents() {
        assert_eq!(Price::from_major_units(99.90).unwrap().as_minor_units(), 9990);
        assert_eq!(Price::from_major_units(0.0).unwrap().as_minor_units(), 0);
        assert_eq!(Price::from_major_units(10.01).unwrap().as_minor_units(), 1001);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(Price::from_major_units(-1.0).is_err());
        assert!(Price::from_major_units(f64::NAN).is_err());
        assert!(Price::from_major_units(f64::INFINITY).is_err());
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn displays_with_two_decimal_places() {
        assert_eq!(Price::from_cents(9990).unwrap().to_string(), "99.90");
        assert_eq!(Price::from_cents(5).unwrap().to_string(), "0.05");
    }

    #[test]
    fn zero_is_free() {
        assert!(Price::from_cents(0).unwrap().is_free());
        assert!(!Price::from_cents(1).unwrap().is_free());
    }

    proptest! {
        #[test]
        fn cents_roundtrip_through_major_units(cents in 0i64..10_000_000) {
            let price = Price::from_cents(cents).unwrap();
            let back = Price::from_major_units(price.as_major_units()).unwrap();
            prop_assert_eq!(price, back);
        }
    }
}
