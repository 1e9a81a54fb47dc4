//! Type-safe price representation.
//!
//! The storefront sells in Pakistani Rupees and the backend stores whole-rupee
//! amounts, so prices are plain integers in the smallest currency unit. All
//! arithmetic stays in integer space; formatting adds thousands separators
//! for display (e.g. `PKR 1,000`).

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// A monetary amount in whole rupees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(0);

    /// Create a price from a rupee amount.
    #[must_use]
    pub const fn new(rupees: i64) -> Self {
        Self(rupees)
    }

    /// Get the amount in rupees.
    #[must_use]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// Saturating addition. Totals are derived values, so overflow clamps
    /// rather than wrapping or panicking.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Format the amount with thousands separators, without the currency
    /// prefix (e.g. `129,999`).
    #[must_use]
    pub fn grouped(&self) -> String {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i).is_multiple_of(3) {
                out.push(',');
            }
            out.push(c);
        }
        if negative {
            format!("-{out}")
        } else {
            out
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PKR {}", self.grouped())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
