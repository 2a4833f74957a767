//! Token decimal places.

use alloy_primitives::U256;

use crate::error::AmmError;

/// Maximum allowed decimal places.
const MAX_DECIMALS: u8 = 18;

/// Number of decimal places of a token.
///
/// Valid range is `0..=18`.  The stable curve normalises both reserves to
/// 18 decimals before evaluating its invariant, so anything above 18
/// is rejected at construction.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::Decimals;
///
/// let d = Decimals::new(6).expect("6 is valid");
/// assert_eq!(d.get(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimals(u8);

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Eighteen decimal places, the normalisation target.
    pub const MAX: Self = Self(MAX_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrecision`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self, AmmError> {
        if value > MAX_DECIMALS {
            return Err(AmmError::InvalidPrecision("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^decimals`.
    #[must_use]
    pub fn factor(&self) -> U256 {
        ten_pow(self.0)
    }

    /// Returns the multiplier lifting a raw amount with these decimals
    /// to 18-decimal precision: `10^(18 - decimals)`.
    #[must_use]
    pub fn normalizer(&self) -> U256 {
        ten_pow(MAX_DECIMALS - self.0)
    }
}

/// `10^exp` for `exp <= 18`; cannot overflow a 256-bit integer.
fn ten_pow(exp: u8) -> U256 {
    let mut acc = U256::from(1u8);
    for _ in 0..exp {
        acc *= U256::from(10u8);
    }
    acc
}
