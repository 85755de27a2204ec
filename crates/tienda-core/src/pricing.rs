//! Price quotes and magnitude-aware ceiling rounding.
//!
//! Converted prices in high-denomination currencies are rounded *up* to a
//! step chosen by the magnitude of the value, so the displayed price is
//! never below the true converted value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The rounding step for a converted value.
///
/// Values are assumed positive (catalog prices are).
#[must_use]
pub fn rounding_step(value: f64) -> f64 {
    if value < 1_000.0 {
        10.0
    } else if value < 10_000.0 {
        100.0
    } else if value < 100_000.0 {
        1_000.0
    } else {
        10_000.0
    }
}

/// Round `value` up to the nearest multiple of its magnitude step.
///
/// Exact multiples stay as they are; everything else moves up.
#[must_use]
pub fn round_up_to_step(value: f64) -> f64 {
    let step = rounding_step(value);
    (value / step).ceil() * step
}

/// A price in a display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// The amount in `currency`.
    pub amount: f64,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Whether magnitude rounding was applied.
    pub rounded: bool,
}

impl Quote {
    /// A quote kept exact (base currency or an exempt currency).
    #[must_use]
    pub fn exact(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            rounded: false,
        }
    }

    /// A quote rounded up to the magnitude step.
    #[must_use]
    pub fn rounded(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount: round_up_to_step(amount),
            currency: currency.into(),
            rounded: true,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rounded {
            write!(f, "{:.0} {}", self.amount, self.currency)
        } else {
            write!(f, "{:.2} {}", self.amount, self.currency)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_by_magnitude() {
        assert_eq!(rounding_step(1.0), 10.0);
        assert_eq!(rounding_step(999.0), 10.0);
        assert_eq!(rounding_step(1_000.0), 100.0);
        assert_eq!(rounding_step(9_999.0), 100.0);
        assert_eq!(rounding_step(10_000.0), 1_000.0);
        assert_eq!(rounding_step(99_999.0), 1_000.0);
        assert_eq!(rounding_step(100_000.0), 10_000.0);
        assert_eq!(rounding_step(2_500_000.0), 10_000.0);
    }

    #[test]
    fn rounding_is_always_ceiling() {
        assert_eq!(round_up_to_step(999.0), 1_000.0);
        assert_eq!(round_up_to_step(1_001.0), 1_100.0);
        assert_eq!(round_up_to_step(12_345.0), 13_000.0);
        assert_eq!(round_up_to_step(123_456.0), 130_000.0);
    }

    #[test]
    fn exact_multiples_are_kept() {
        assert_eq!(round_up_to_step(990.0), 990.0);
        assert_eq!(round_up_to_step(13_000.0), 13_000.0);
    }

    #[test]
    fn quote_display() {
        let rounded = Quote::rounded(999.0, "ARS");
        assert_eq!(rounded.amount, 1_000.0);
        assert_eq!(rounded.to_string(), "1000 ARS");

        let exact = Quote::exact(27.431, "EUR");
        assert_eq!(exact.to_string(), "27.43 EUR");
    }
}
