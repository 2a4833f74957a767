//! Volatile curve: constant product (Uniswap v2 style).
//!
//! # Invariant
//!
//! ```text
//! x · y = k
//! ```
//!
//! # Pricing
//!
//! 0.3% of the input is kept by the pool:
//!
//! ```text
//! amount_out = amount_in·997·reserve_out / (reserve_in·1000 + amount_in·997)       (floor)
//! amount_in  = reserve_in·amount_out·1000 / ((reserve_out − amount_out)·997)       (ceil)
//! ```
//!
//! Rounding always favours the pool.
//!
//! # Post-swap check
//!
//! ```text
//! (balance_base·1000 − in_base·3) · (balance_quote·1000 − in_quote·3)
//!     >= reserve_base · reserve_quote · 1_000_000
//! ```

use alloy_primitives::U256;

use super::{FEE_DENOMINATOR, FEE_NUMERATOR, FEE_RETAINED};
use crate::domain::{Amount, CurveId, Decimals, Rounding};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::{InvariantCheck, PricingCurve};

/// Label hashed into the curve id.
const LABEL: &str = "volatile";

/// Constant-product pricing curve.
///
/// Stateless; decimals are accepted for interface uniformity but do not
/// affect constant-product pricing.
///
/// # Examples
///
/// ```
/// use stark_amm::curves::VolatileCurve;
/// use stark_amm::domain::{Amount, Decimals};
/// use stark_amm::traits::PricingCurve;
///
/// let curve = VolatileCurve::new();
/// let out = curve
///     .amount_out(
///         Amount::from(2u64),
///         Amount::from(100u64),
///         Amount::from(100u64),
///         Decimals::MAX,
///         Decimals::MAX,
///     )
///     .expect("priced");
/// assert_eq!(out, Amount::from(1u64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolatileCurve;

impl VolatileCurve {
    /// Creates the volatile curve.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn check_reserves(reserve_in: Amount, reserve_out: Amount) -> Result<(), AmmError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(())
}

/// `balance·1000 − amount_in·3`: the balance with the retained fee removed,
/// scaled by 1000.
fn fee_adjusted(balance: Amount, amount_in: Amount) -> Result<Amount, AmmError> {
    balance
        .safe_mul_u64(FEE_DENOMINATOR)?
        .safe_sub(&amount_in.safe_mul_u64(FEE_RETAINED)?)
}

impl PricingCurve for VolatileCurve {
    fn id(&self) -> CurveId {
        CurveId::from_label(LABEL)
    }

    fn amount_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        _decimals_in: Decimals,
        _decimals_out: Decimals,
    ) -> Result<Amount, AmmError> {
        if amount_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        check_reserves(reserve_in, reserve_out)?;

        let amount_in_with_fee = amount_in.safe_mul_u64(FEE_NUMERATOR)?;
        let numerator = amount_in_with_fee.safe_mul(&reserve_out)?;
        let denominator = reserve_in
            .safe_mul_u64(FEE_DENOMINATOR)?
            .safe_add(&amount_in_with_fee)?;
        numerator.safe_div(&denominator, Rounding::Down)
    }

    fn amount_in(
        &self,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        _decimals_in: Decimals,
        _decimals_out: Decimals,
    ) -> Result<Amount, AmmError> {
        if amount_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        check_reserves(reserve_in, reserve_out)?;
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        let numerator = reserve_in
            .safe_mul(&amount_out)?
            .safe_mul_u64(FEE_DENOMINATOR)?;
        let denominator = reserve_out
            .safe_sub(&amount_out)?
            .safe_mul_u64(FEE_NUMERATOR)?;
        numerator.safe_div(&denominator, Rounding::Up)
    }

    fn k(
        &self,
        reserve_base: Amount,
        reserve_quote: Amount,
        _decimals_base: Decimals,
        _decimals_quote: Decimals,
    ) -> Result<U256, AmmError> {
        Ok(reserve_base.safe_mul(&reserve_quote)?.get())
    }

    fn check_invariant(&self, check: &InvariantCheck) -> Result<(), AmmError> {
        let adjusted_base = fee_adjusted(check.balance_base, check.amount_base_in)?;
        let adjusted_quote = fee_adjusted(check.balance_quote, check.amount_quote_in)?;

        let after = adjusted_base.safe_mul(&adjusted_quote)?;
        let before = check
            .reserve_base
            .safe_mul(&check.reserve_quote)?
            .safe_mul_u64(FEE_DENOMINATOR * FEE_DENOMINATOR)?;

        if after < before {
            return Err(AmmError::K);
        }
        Ok(())
    }
}
