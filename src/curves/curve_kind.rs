//! Enum dispatch wrapper for all pricing curves.
//!
//! [`CurveKind`] wraps every concrete curve behind a single enum so the
//! factory can whitelist heterogeneous curves in one map and pairs can be
//! bound to any of them without `dyn` trait objects.

use alloy_primitives::U256;

use super::stable::StableCurve;
use super::volatile::VolatileCurve;
use crate::domain::{Amount, CurveId, Decimals, Rounding};
use crate::error::AmmError;
use crate::traits::{InvariantCheck, PricingCurve};

/// Static dispatch enum over the supported pricing curves.
///
/// Implements [`PricingCurve`] by delegating every call to the inner
/// curve via `match`.
///
/// # Examples
///
/// ```
/// use stark_amm::curves::{CurveKind, StableCurve, VolatileCurve};
/// use stark_amm::traits::PricingCurve;
///
/// let volatile = CurveKind::Volatile(VolatileCurve::new());
/// let stable = CurveKind::Stable(StableCurve::default());
/// assert_ne!(volatile.id(), stable.id());
/// assert_eq!(volatile.name(), "volatile");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Constant product.
    Volatile(VolatileCurve),
    /// StableSwap.
    Stable(StableCurve),
}

impl CurveKind {
    /// Short human-readable name, used in log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Volatile(_) => "volatile",
            Self::Stable(_) => "stable",
        }
    }
}

impl From<VolatileCurve> for CurveKind {
    fn from(curve: VolatileCurve) -> Self {
        Self::Volatile(curve)
    }
}

impl From<StableCurve> for CurveKind {
    fn from(curve: StableCurve) -> Self {
        Self::Stable(curve)
    }
}

/// Delegates a method call to the inner curve of every variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            CurveKind::Volatile(c) => c.$method($($arg),*),
            CurveKind::Stable(c) => c.$method($($arg),*),
        }
    };
}

impl PricingCurve for CurveKind {
    fn id(&self) -> CurveId {
        delegate!(self, id())
    }

    fn amount_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
    ) -> Result<Amount, AmmError> {
        delegate!(
            self,
            amount_out(amount_in, reserve_in, reserve_out, decimals_in, decimals_out)
        )
    }

    fn amount_in(
        &self,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
    ) -> Result<Amount, AmmError> {
        delegate!(
            self,
            amount_in(amount_out, reserve_in, reserve_out, decimals_in, decimals_out)
        )
    }

    fn k(
        &self,
        reserve_base: Amount,
        reserve_quote: Amount,
        decimals_base: Decimals,
        decimals_quote: Decimals,
    ) -> Result<U256, AmmError> {
        delegate!(
            self,
            k(reserve_base, reserve_quote, decimals_base, decimals_quote)
        )
    }

    fn check_invariant(&self, check: &InvariantCheck) -> Result<(), AmmError> {
        delegate!(self, check_invariant(check))
    }
}

/// Proportional quote: the amount of B worth `amount_a` of A at the
/// current reserve ratio.  Curve-independent.
///
/// ```text
/// amount_b = amount_a · reserve_b / reserve_a        (floor)
/// ```
///
/// # Errors
///
/// - [`AmmError::InsufficientAmount`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if `amount_a · reserve_b` exceeds 256 bits.
///
/// # Examples
///
/// ```
/// use stark_amm::curves::quote;
/// use stark_amm::domain::Amount;
///
/// let b = quote(Amount::from(1u64), Amount::from(100u64), Amount::from(200u64));
/// assert_eq!(b, Ok(Amount::from(2u64)));
/// ```
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let product = amount_a
        .checked_mul(&reserve_b)
        .ok_or(AmmError::Overflow("quote product overflow"))?;
    product
        .checked_div(&reserve_a, Rounding::Down)
        .ok_or(AmmError::DivisionByZero)
}
