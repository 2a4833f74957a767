//! Pricing curve implementations and the [`CurveKind`] dispatch enum.
//!
//! | Curve | Invariant | Style |
//! |-------|-----------|-------|
//! | [`VolatileCurve`] | `x · y = k` | Uniswap v2 |
//! | [`StableCurve`] | StableSwap, amplification `A` | Curve |
//!
//! Both charge the same 0.3% input fee, expressed by the constants below.

mod curve_kind;
mod stable;
mod volatile;

#[cfg(test)]
mod proptest_properties;

pub use curve_kind::{quote, CurveKind};
pub use stable::{StableCurve, DEFAULT_AMPLIFICATION, MAX_AMPLIFICATION, MIN_AMPLIFICATION};
pub use volatile::VolatileCurve;

/// Share of the input that reaches the pricing formula, per mille.
pub(crate) const FEE_NUMERATOR: u64 = 997;

/// Fee denominator (per mille).
pub(crate) const FEE_DENOMINATOR: u64 = 1_000;

/// Share of the input retained by the pool as fee, per mille.
pub(crate) const FEE_RETAINED: u64 = FEE_DENOMINATOR - FEE_NUMERATOR;
