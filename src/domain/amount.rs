//! Raw token amount with checked 256-bit arithmetic.

use core::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::Rounding;

/// A raw token amount in the smallest unit of its token.
///
/// `Amount` never interprets decimals; that is the job of
/// [`Decimals`](super::Decimals).  Every value of a 256-bit unsigned
/// integer is a valid amount, so there is no negative state to guard.
///
/// Arithmetic methods are checked: they return `None` on overflow,
/// underflow, or division by zero instead of wrapping or panicking.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::{Amount, Rounding};
///
/// let a = Amount::from(100u64);
/// let b = Amount::from(200u64);
/// assert_eq!(a.checked_add(&b), Some(Amount::from(300u64)));
/// assert_eq!(b.checked_div(&Amount::from(3u64), Rounding::Up), Some(Amount::from(67u64)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[must_use]
pub struct Amount(U256);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Maximum representable amount.
    pub const MAX: Self = Self(U256::MAX);

    /// Wraps a raw 256-bit value.
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Returns the underlying 256-bit value.
    #[must_use]
    pub const fn get(&self) -> U256 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `amount × 10^decimals`, for building fixtures like `expand(5, 18)`.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn expand(whole: u128, decimals: u8) -> Option<Self> {
        let mut acc = U256::from(whole);
        for _ in 0..decimals {
            acc = acc.checked_mul(U256::from(10u8))?;
        }
        Some(Self(acc))
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    /// Checked division with explicit rounding direction.
    ///
    /// - [`Rounding::Down`]: floor division.
    /// - [`Rounding::Up`]: ceiling division, `floor(n / d) + (n % d != 0)`.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        let q = self.0.checked_div(divisor.0)?;
        match rounding {
            Rounding::Down => Some(Self(q)),
            Rounding::Up => {
                let r = self.0.checked_rem(divisor.0)?;
                if r.is_zero() {
                    Some(Self(q))
                } else {
                    // q < MAX whenever a remainder exists
                    q.checked_add(U256::from(1u8)).map(Self)
                }
            }
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
