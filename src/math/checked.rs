//! Checked arithmetic for token amounts.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of panicking on overflow, underflow, or division by zero.
//!
//! # Examples
//!
//! ```
//! use stark_amm::domain::Amount;
//! use stark_amm::math::CheckedArithmetic;
//!
//! let a = Amount::from(100u64);
//! let b = Amount::from(200u64);
//! assert_eq!(a.safe_add(&b), Ok(Amount::from(300u64)));
//! assert!(a.safe_sub(&b).is_err());
//! ```

use alloy_primitives::U256;

use crate::domain::{Amount, Rounding};
use crate::error::AmmError;

/// Fallible arithmetic for domain wrapper types.
///
/// Every method returns [`Result<Self, AmmError>`] with a specific error
/// variant so callers can tell overflow from underflow from division by
/// zero.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds 256 bits.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds 256 bits.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError>;

    /// Checked multiplication by a small constant, e.g. the fee factors
    /// `997` and `1000`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds 256 bits.
    fn safe_mul_u64(&self, factor: u64) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(other)
            .ok_or(AmmError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        self.checked_div(other, rounding)
            .ok_or(AmmError::DivisionByZero)
    }

    #[inline]
    fn safe_mul_u64(&self, factor: u64) -> Result<Self, AmmError> {
        self.checked_mul(&Amount::from(factor))
            .ok_or(AmmError::Overflow("amount scaling overflow"))
    }
}

/// `a × b / d` on raw 256-bit values with explicit rounding.
///
/// # Errors
///
/// - [`AmmError::Overflow`] if `a × b` exceeds 256 bits.
/// - [`AmmError::DivisionByZero`] if `d` is zero.
pub fn mul_div(a: U256, b: U256, d: U256, rounding: Rounding) -> Result<U256, AmmError> {
    let product = a
        .checked_mul(b)
        .ok_or(AmmError::Overflow("mul_div product overflow"))?;
    let result = Amount::new(product)
        .checked_div(&Amount::new(d), rounding)
        .ok_or(AmmError::DivisionByZero)?;
    Ok(result.get())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- safe_add / safe_sub ------------------------------------------------

    #[test]
    fn add_ok() {
        let Ok(r) = Amount::from(100u64).safe_add(&Amount::from(200u64)) else {
            panic!("expected Ok");
        };
        assert_eq!(r, Amount::from(300u64));
    }

    #[test]
    fn add_overflow() {
        let Err(AmmError::Overflow(_)) = Amount::MAX.safe_add(&Amount::from(1u64)) else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn sub_underflow() {
        let Err(AmmError::Underflow(_)) = Amount::from(1u64).safe_sub(&Amount::from(2u64)) else {
            panic!("expected Underflow");
        };
    }

    // -- safe_mul / safe_div ------------------------------------------------

    #[test]
    fn mul_overflow() {
        let Err(AmmError::Overflow(_)) = Amount::MAX.safe_mul(&Amount::from(2u64)) else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn div_rounding() {
        let n = Amount::from(10u64);
        let d = Amount::from(3u64);
        assert_eq!(n.safe_div(&d, Rounding::Down), Ok(Amount::from(3u64)));
        assert_eq!(n.safe_div(&d, Rounding::Up), Ok(Amount::from(4u64)));
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(
            Amount::from(1u64).safe_div(&Amount::ZERO, Rounding::Down),
            Err(AmmError::DivisionByZero)
        );
    }

    #[test]
    fn mul_u64() {
        assert_eq!(Amount::from(3u64).safe_mul_u64(997), Ok(Amount::from(2991u64)));
    }

    // -- mul_div ------------------------------------------------------------

    #[test]
    fn mul_div_rounds() {
        let (a, b, d) = (U256::from(7u8), U256::from(5u8), U256::from(3u8));
        assert_eq!(mul_div(a, b, d, Rounding::Down), Ok(U256::from(11u8)));
        assert_eq!(mul_div(a, b, d, Rounding::Up), Ok(U256::from(12u8)));
    }

    #[test]
    fn mul_div_errors() {
        assert_eq!(
            mul_div(U256::from(1u8), U256::from(1u8), U256::ZERO, Rounding::Down),
            Err(AmmError::DivisionByZero)
        );
        let Err(AmmError::Overflow(_)) =
            mul_div(U256::MAX, U256::from(2u8), U256::from(1u8), Rounding::Down)
        else {
            panic!("expected Overflow");
        };
    }
}
