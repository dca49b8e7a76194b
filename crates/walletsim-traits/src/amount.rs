//! Fixed-point ether amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use walletsim_error::{Result, WalletsimError};

/// Number of fractional digits carried by an [`Amount`] (wei precision).
pub const DECIMALS: u32 = 18;

/// Fractional digits used when an amount or balance is shown to a user.
pub const DISPLAY_PLACES: u32 = 4;

const WEI_PER_ETHER: u128 = 10u128.pow(DECIMALS);

/// A non-negative ether amount stored in wei.
///
/// Negative values cannot be represented: text starting with `-` is rejected
/// with [`WalletsimError::InvalidAmount`] and negative floats saturate to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount {
    /// The value in wei
    pub value: u128,
}

impl Amount {
    /// Zero ether
    pub const ZERO: Amount = Amount { value: 0 };

    /// Creates an amount from a wei value
    pub const fn from_smallest_unit(value: u128) -> Self {
        Self { value }
    }

    /// Creates an amount from whole ether
    pub const fn from_ether(ether: u64) -> Self {
        Self {
            value: ether as u128 * WEI_PER_ETHER,
        }
    }

    /// Creates an amount from a human-readable value.
    ///
    /// NaN, infinities and non-positive inputs yield zero.
    pub fn from_human(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::ZERO;
        }
        Self {
            value: (value * WEI_PER_ETHER as f64).round() as u128,
        }
    }

    /// Returns zero amount
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Returns the value in wei
    pub fn smallest_unit(&self) -> u128 {
        self.value
    }

    /// Returns the value in ether as a float (lossy)
    pub fn human_readable(&self) -> f64 {
        self.value as f64 / WEI_PER_ETHER as f64
    }

    /// Checks if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Subtraction that returns `None` when `rhs` exceeds `self`
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.value.checked_sub(rhs.value).map(Amount::from_smallest_unit)
    }

    /// Subtraction clamped at zero
    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount::from_smallest_unit(self.value.saturating_sub(rhs.value))
    }

    /// Addition that returns `None` on overflow
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.value.checked_add(rhs.value).map(Amount::from_smallest_unit)
    }

    /// Divides the amount evenly into `parts` shares, truncating the remainder.
    ///
    /// Zero parts yields zero.
    pub fn split(self, parts: usize) -> Amount {
        if parts == 0 {
            return Amount::ZERO;
        }
        Amount::from_smallest_unit(self.value / parts as u128)
    }

    /// Rounds half-up to `places` fractional digits
    pub fn round_to(self, places: u32) -> Amount {
        if places >= DECIMALS {
            return self;
        }
        let unit = 10u128.pow(DECIMALS - places);
        let remainder = self.value % unit;
        let truncated = self.value - remainder;
        // Rounding up past u128::MAX falls back to the truncated multiple.
        match truncated.checked_add(unit) {
            Some(up) if remainder * 2 >= unit => Amount::from_smallest_unit(up),
            _ => Amount::from_smallest_unit(truncated),
        }
    }

    /// Renders the amount with exactly `places` fractional digits (half-up)
    pub fn to_fixed(&self, places: u32) -> String {
        let places = places.min(DECIMALS);
        let rounded = self.round_to(places);
        let whole = rounded.value / WEI_PER_ETHER;
        if places == 0 {
            return whole.to_string();
        }
        let fraction = (rounded.value % WEI_PER_ETHER) / 10u128.pow(DECIMALS - places);
        format!("{whole}.{fraction:0width$}", width = places as usize)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed(DISPLAY_PLACES))
    }
}

impl FromStr for Amount {
    type Err = WalletsimError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(WalletsimError::MalformedAmount("empty amount".into()));
        }
        if let Some(magnitude) = text.strip_prefix('-') {
            if magnitude.starts_with(['-', '+']) {
                return Err(WalletsimError::MalformedAmount(text.to_string()));
            }
            // Well-formed negatives are a value error, not a syntax error.
            magnitude.parse::<Amount>()?;
            return Err(WalletsimError::InvalidAmount);
        }
        let unsigned = text.strip_prefix('+').unwrap_or(text);
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
            return Err(WalletsimError::MalformedAmount(text.to_string()));
        }
        if fraction.len() > DECIMALS as usize {
            return Err(WalletsimError::MalformedAmount(format!(
                "{text}: more than {DECIMALS} fractional digits"
            )));
        }

        let whole: u128 = if whole.is_empty() { 0 } else { whole.parse()? };
        let fraction: u128 = if fraction.is_empty() {
            0
        } else {
            fraction.parse::<u128>()? * 10u128.pow(DECIMALS - fraction.len() as u32)
        };

        whole
            .checked_mul(WEI_PER_ETHER)
            .and_then(|wei| wei.checked_add(fraction))
            .map(Amount::from_smallest_unit)
            .ok_or_else(|| WalletsimError::MalformedAmount(format!("{text}: amount too large")))
    }
}
