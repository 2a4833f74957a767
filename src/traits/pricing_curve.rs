//! Pricing curve capability contract.
//!
//! A curve is a stateless strategy: given reserves it prices a trade in
//! either direction, reports its invariant value for protocol-fee
//! accounting, and verifies that a settled swap did not decrease the
//! fee-adjusted invariant.
//!
//! # Fee Model
//!
//! Every curve charges 0.3% of the input.  The fee stays in the pool:
//! the post-swap check runs on balances with `3/1000` of each input
//! removed, so the retained fee is what makes the invariant grow.
//!
//! # Dispatch Model
//!
//! Curves are dispatched through the [`CurveKind`](crate::curves::CurveKind)
//! enum rather than `dyn` trait objects.

use alloy_primitives::U256;

use crate::domain::{Amount, CurveId, Decimals};
use crate::error::AmmError;

/// Pre- and post-swap state handed to [`PricingCurve::check_invariant`].
///
/// `balance_*` are the pair's token balances after the optimistic
/// transfer (and any flash callback); `amount_*_in` are the inputs derived
/// from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantCheck {
    /// Base reserve before the swap.
    pub reserve_base: Amount,
    /// Quote reserve before the swap.
    pub reserve_quote: Amount,
    /// Base balance after the swap.
    pub balance_base: Amount,
    /// Quote balance after the swap.
    pub balance_quote: Amount,
    /// Base tokens received.
    pub amount_base_in: Amount,
    /// Quote tokens received.
    pub amount_quote_in: Amount,
    /// Base token decimals.
    pub decimals_base: Decimals,
    /// Quote token decimals.
    pub decimals_quote: Decimals,
}

/// Capability contract implemented by every pricing curve.
///
/// # Errors
///
/// All pricing methods share the same failure modes:
///
/// - [`AmmError::InsufficientInputAmount`] /
///   [`AmmError::InsufficientOutputAmount`] if the priced amount is zero.
/// - [`AmmError::InsufficientLiquidity`] if a reserve is zero, or an
///   exact output reaches the output reserve.
/// - [`AmmError::Overflow`] if an intermediate value exceeds 256 bits.
pub trait PricingCurve {
    /// Opaque id under which the curve is whitelisted.
    fn id(&self) -> CurveId;

    /// Output received for selling exactly `amount_in`.
    ///
    /// # Errors
    ///
    /// See the trait-level error list.
    fn amount_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
    ) -> Result<Amount, AmmError>;

    /// Smallest input whose output is at least `amount_out`.
    ///
    /// # Errors
    ///
    /// See the trait-level error list.
    fn amount_in(
        &self,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
    ) -> Result<Amount, AmmError>;

    /// Invariant value `k` of the given reserves, recorded as `k_last`
    /// for protocol-fee accrual.  Its square root measures pool growth.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the invariant exceeds 256 bits.
    fn k(
        &self,
        reserve_base: Amount,
        reserve_quote: Amount,
        decimals_base: Decimals,
        decimals_quote: Decimals,
    ) -> Result<U256, AmmError>;

    /// Verifies that the fee-adjusted post-swap balances preserve the
    /// invariant implied by the pre-swap reserves.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::K`] if the invariant decreased.
    fn check_invariant(&self, check: &InvariantCheck) -> Result<(), AmmError>;
}
