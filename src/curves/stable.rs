//! Stable curve: StableSwap invariant for two assets (Curve style).
//!
//! Specialised for low-slippage swaps between similarly priced assets.
//!
//! # Invariant (n = 2)
//!
//! ```text
//! A · 2 · (x + y) + D = A · D · 2 + D³ / (4 · x · y)
//! ```
//!
//! where:
//! - `A`: amplification coefficient (1 to 10 000).
//! - `D`: invariant (equals `x + y` when the pool is balanced).
//! - `x`, `y`: reserves normalised to 18 decimals.
//!
//! # Pricing
//!
//! 1. Normalise both reserves to 18 decimals.
//! 2. `D = compute_d(x, y)`.
//! 3. `x_new = (reserve_in·1000 + amount_in·997) · scale_in / 1000`.
//! 4. `y_new = compute_y(x_new, D)`.
//! 5. `amount_out = (y − y_new − 1) / scale_out`, floored.
//!
//! The exact-output direction searches for the smallest input whose
//! exact-input output reaches the target.
//!
//! # Amplification Behaviour
//!
//! | A | Curve |
//! |---|-------|
//! | 1 | Close to constant product |
//! | 50 to 5 000 | Low slippage near peg |
//! | large | Approaches constant sum |

use alloy_primitives::U256;
use tracing::trace;

use super::{FEE_DENOMINATOR, FEE_NUMERATOR, FEE_RETAINED};
use crate::config::StableCurveConfig;
use crate::domain::{Amount, CurveId, Decimals};
use crate::error::AmmError;
use crate::traits::{FromConfig, InvariantCheck, PricingCurve};

/// Default amplification coefficient.
pub const DEFAULT_AMPLIFICATION: u64 = 100;

/// Smallest accepted amplification coefficient.
pub const MIN_AMPLIFICATION: u64 = 1;

/// Largest accepted amplification coefficient.
pub const MAX_AMPLIFICATION: u64 = 10_000;

/// Number of assets in a pair.
const N: u64 = 2;

/// Maximum Newton-Raphson iterations before declaring non-convergence.
const MAX_ITERATIONS: u32 = 256;

/// Upper bound on doubling steps of the exact-output search.
const MAX_SEARCH_STEPS: u32 = 256;

// ---------------------------------------------------------------------------
// Checked helpers
// ---------------------------------------------------------------------------

fn mul(a: U256, b: U256, what: &'static str) -> Result<U256, AmmError> {
    a.checked_mul(b).ok_or(AmmError::Overflow(what))
}

fn add(a: U256, b: U256, what: &'static str) -> Result<U256, AmmError> {
    a.checked_add(b).ok_or(AmmError::Overflow(what))
}

fn div(a: U256, b: U256) -> Result<U256, AmmError> {
    a.checked_div(b).ok_or(AmmError::DivisionByZero)
}

// ---------------------------------------------------------------------------
// StableSwap math
// ---------------------------------------------------------------------------

/// Computes the StableSwap invariant `D` for two normalised reserves via
/// Newton-Raphson iteration.
///
/// ```text
/// D_next = (A·n·S + n·D_P) · D / ((A·n − 1)·D + (n+1)·D_P)
/// D_P    = D³ / (n^n · x · y)
/// ```
///
/// Inputs are ordered before iterating so `D` does not depend on which
/// side is passed first.
///
/// # Errors
///
/// - [`AmmError::Overflow`] if an intermediate exceeds 256 bits.
/// - [`AmmError::NewtonRaphsonNonConvergence`] after [`MAX_ITERATIONS`].
fn compute_d(x: U256, y: U256, amp: u64) -> Result<U256, AmmError> {
    let (x, y) = if x <= y { (x, y) } else { (y, x) };
    let s = add(x, y, "D: S overflow")?;
    if s.is_zero() {
        return Ok(U256::ZERO);
    }
    if x.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }

    let n = U256::from(N);
    let ann = mul(U256::from(amp), n, "D: A·n overflow")?;
    let ann_minus_one = ann - U256::from(1u8);
    let n_plus_one = n + U256::from(1u8);
    let ann_s = mul(ann, s, "D: ann·S overflow")?;

    let mut d = s;
    for _ in 0..MAX_ITERATIONS {
        let mut d_p = d;
        d_p = div(mul(d_p, d, "D: d_p·d overflow")?, mul(n, x, "D: n·x overflow")?)?;
        d_p = div(mul(d_p, d, "D: d_p·d overflow")?, mul(n, y, "D: n·y overflow")?)?;

        let d_prev = d;
        let numerator = mul(
            add(ann_s, mul(n, d_p, "D: n·D_P overflow")?, "D: num inner overflow")?,
            d,
            "D: numerator overflow",
        )?;
        let denominator = add(
            mul(ann_minus_one, d, "D: denom left overflow")?,
            mul(n_plus_one, d_p, "D: denom right overflow")?,
            "D: denominator overflow",
        )?;
        d = div(numerator, denominator)?;

        if d.abs_diff(d_prev) <= U256::from(1u8) {
            return Ok(d);
        }
    }

    Err(AmmError::NewtonRaphsonNonConvergence(
        "D computation did not converge within 256 iterations",
    ))
}

/// Solves the invariant for the other reserve given one side `x_new`.
///
/// ```text
/// c      = D³ / (4 · x_new · A·n)
/// b      = x_new + D / (A·n)
/// y_next = (y² + c) / (2·y + b − D)
/// ```
///
/// # Errors
///
/// - [`AmmError::Overflow`] if an intermediate exceeds 256 bits.
/// - [`AmmError::DivisionByZero`] if `x_new` is zero.
/// - [`AmmError::NewtonRaphsonNonConvergence`] after [`MAX_ITERATIONS`].
fn compute_y(x_new: U256, d: U256, amp: u64) -> Result<U256, AmmError> {
    let n = U256::from(N);
    let ann = mul(U256::from(amp), n, "y: A·n overflow")?;

    let d_sq = mul(d, d, "y: D² overflow")?;
    let c_part = div(d_sq, mul(n, x_new, "y: 2x overflow")?)?;
    let c = div(mul(c_part, d, "y: c overflow")?, mul(n, ann, "y: 2·ann overflow")?)?;
    let b = add(x_new, div(d, ann)?, "y: b overflow")?;

    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
        let y_prev = y;
        let numerator = add(mul(y, y, "y: y² overflow")?, c, "y: num overflow")?;
        let denominator = add(mul(n, y, "y: 2y overflow")?, b, "y: denom overflow")?
            .checked_sub(d)
            .ok_or(AmmError::Underflow("y: denominator underflow"))?;
        y = div(numerator, denominator)?;

        if y.abs_diff(y_prev) <= U256::from(1u8) {
            return Ok(y);
        }
    }

    Err(AmmError::NewtonRaphsonNonConvergence(
        "y computation did not converge within 256 iterations",
    ))
}

/// `(balance·1000 − amount_in·3) · scale / 1000`: a balance with the
/// retained fee removed, normalised to 18 decimals.
fn adjusted_normalised(
    balance: Amount,
    amount_in: Amount,
    scale: U256,
) -> Result<U256, AmmError> {
    let scaled = mul(balance.get(), U256::from(FEE_DENOMINATOR), "adjust: balance overflow")?;
    let fee = mul(amount_in.get(), U256::from(FEE_RETAINED), "adjust: fee overflow")?;
    let net = scaled
        .checked_sub(fee)
        .ok_or(AmmError::Underflow("adjust: fee exceeds balance"))?;
    div(mul(net, scale, "adjust: normalise overflow")?, U256::from(FEE_DENOMINATOR))
}

// ---------------------------------------------------------------------------
// StableCurve
// ---------------------------------------------------------------------------

/// StableSwap pricing curve with a configurable amplification coefficient.
///
/// Two stable curves with different amplifications are different curves
/// and have different [`CurveId`]s.
///
/// # Examples
///
/// ```
/// use stark_amm::curves::StableCurve;
/// use stark_amm::domain::{Amount, Decimals};
/// use stark_amm::traits::PricingCurve;
///
/// let curve = StableCurve::new(100).expect("valid amplification");
/// let reserve = Amount::expand(1_000, 18).expect("fits");
/// let input = Amount::expand(1, 18).expect("fits");
/// let out = curve
///     .amount_out(input, reserve, reserve, Decimals::MAX, Decimals::MAX)
///     .expect("priced");
/// // near 1:1 minus the 0.3% fee
/// assert!(out < input);
/// assert!(out > Amount::expand(99, 16).expect("fits"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableCurve {
    amplification: u64,
}

impl StableCurve {
    /// Creates a stable curve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `amplification` is
    /// outside `1..=10_000`.
    pub const fn new(amplification: u64) -> Result<Self, AmmError> {
        if amplification < MIN_AMPLIFICATION || amplification > MAX_AMPLIFICATION {
            return Err(AmmError::InvalidConfiguration(
                "amplification must be in 1..=10000",
            ));
        }
        Ok(Self { amplification })
    }

    /// Returns the amplification coefficient.
    #[must_use]
    pub const fn amplification(&self) -> u64 {
        self.amplification
    }

    /// Output for `amount_in` on normalised reserves with a known `D`.
    fn out_given_in(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        scale_in: U256,
        y: U256,
        scale_out: U256,
        d: U256,
    ) -> Result<Amount, AmmError> {
        let fee_scaled = add(
            mul(reserve_in.get(), U256::from(FEE_DENOMINATOR), "out: reserve overflow")?,
            mul(amount_in.get(), U256::from(FEE_NUMERATOR), "out: input overflow")?,
            "out: x_new overflow",
        )?;
        let x_new = div(
            mul(fee_scaled, scale_in, "out: normalise overflow")?,
            U256::from(FEE_DENOMINATOR),
        )?;
        let y_new = compute_y(x_new, d, self.amplification)?;

        let out_norm = y
            .checked_sub(y_new)
            .and_then(|v| v.checked_sub(U256::from(1u8)))
            .unwrap_or(U256::ZERO);
        Ok(Amount::new(div(out_norm, scale_out)?))
    }
}

impl Default for StableCurve {
    fn default() -> Self {
        Self {
            amplification: DEFAULT_AMPLIFICATION,
        }
    }
}

impl FromConfig<StableCurveConfig> for StableCurve {
    fn from_config(config: &StableCurveConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Self::new(config.amplification())
    }
}

fn check_reserves(reserve_in: Amount, reserve_out: Amount) -> Result<(), AmmError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(())
}

impl PricingCurve for StableCurve {
    fn id(&self) -> CurveId {
        CurveId::from_label(&format!("stable:{}", self.amplification))
    }

    fn amount_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
    ) -> Result<Amount, AmmError> {
        if amount_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        check_reserves(reserve_in, reserve_out)?;

        let (scale_in, scale_out) = (decimals_in.normalizer(), decimals_out.normalizer());
        let x = mul(reserve_in.get(), scale_in, "out: reserve_in normalise overflow")?;
        let y = mul(reserve_out.get(), scale_out, "out: reserve_out normalise overflow")?;
        let d = compute_d(x, y, self.amplification)?;

        self.out_given_in(amount_in, reserve_in, scale_in, y, scale_out, d)
    }

    fn amount_in(
        &self,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
    ) -> Result<Amount, AmmError> {
        if amount_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        check_reserves(reserve_in, reserve_out)?;
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        let (scale_in, scale_out) = (decimals_in.normalizer(), decimals_out.normalizer());
        let x = mul(reserve_in.get(), scale_in, "in: reserve_in normalise overflow")?;
        let y = mul(reserve_out.get(), scale_out, "in: reserve_out normalise overflow")?;
        let d = compute_d(x, y, self.amplification)?;
        let out_at = |amount: Amount| self.out_given_in(amount, reserve_in, scale_in, y, scale_out, d);

        // Analytic estimate from the invariant solved for the input side.
        let y_target = mul(
            reserve_out.saturating_sub(&amount_out).get(),
            scale_out,
            "in: target normalise overflow",
        )?;
        let x_needed = compute_y(y_target, d, self.amplification)?;
        let delta = x_needed.saturating_sub(x);
        let estimate = div(
            mul(delta, U256::from(FEE_DENOMINATOR), "in: estimate overflow")?,
            mul(U256::from(FEE_NUMERATOR), scale_in, "in: estimate scale overflow")?,
        )?
        .max(U256::from(1u8));

        // Invariant of the search: out_at(lo) < amount_out <= out_at(hi).
        let mut hi = Amount::new(estimate);
        let mut lo = Amount::ZERO;
        let mut steps = 0;
        while out_at(hi)? < amount_out {
            lo = hi;
            hi = hi
                .checked_mul(&Amount::from(2u64))
                .ok_or(AmmError::InsufficientLiquidity)?;
            steps += 1;
            if steps > MAX_SEARCH_STEPS {
                return Err(AmmError::InsufficientLiquidity);
            }
        }
        let one = Amount::from(1u64);
        while hi.saturating_sub(&lo) > one {
            let half = Amount::new(hi.saturating_sub(&lo).get() >> 1);
            let mid = lo.checked_add(&half).ok_or(AmmError::Overflow("in: midpoint overflow"))?;
            if out_at(mid)? >= amount_out {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        trace!(%amount_out, amount_in = %hi, "stable exact-output search settled");
        Ok(hi)
    }

    fn k(
        &self,
        reserve_base: Amount,
        reserve_quote: Amount,
        decimals_base: Decimals,
        decimals_quote: Decimals,
    ) -> Result<U256, AmmError> {
        let x = mul(reserve_base.get(), decimals_base.normalizer(), "k: base normalise overflow")?;
        let y = mul(reserve_quote.get(), decimals_quote.normalizer(), "k: quote normalise overflow")?;
        let half_d = compute_d(x, y, self.amplification)? >> 1;
        mul(half_d, half_d, "k: square overflow")
    }

    fn check_invariant(&self, check: &InvariantCheck) -> Result<(), AmmError> {
        let (scale_base, scale_quote) = (
            check.decimals_base.normalizer(),
            check.decimals_quote.normalizer(),
        );
        let x = mul(check.reserve_base.get(), scale_base, "check: base normalise overflow")?;
        let y = mul(check.reserve_quote.get(), scale_quote, "check: quote normalise overflow")?;
        let d = compute_d(x, y, self.amplification)?;

        let adj_base = adjusted_normalised(check.balance_base, check.amount_base_in, scale_base)?;
        let adj_quote =
            adjusted_normalised(check.balance_quote, check.amount_quote_in, scale_quote)?;

        // Solve from the side that received input; the other side must
        // stay strictly above the curve.
        let (input_side, other_side) = if check.amount_base_in.is_zero() {
            (adj_quote, adj_base)
        } else {
            (adj_base, adj_quote)
        };
        if input_side.is_zero() {
            return Err(AmmError::K);
        }
        let required = compute_y(input_side, d, self.amplification)?;
        if other_side <= required {
            return Err(AmmError::K);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::curves::VolatileCurve;

    fn e18(v: u128) -> Amount {
        let Some(a) = Amount::expand(v, 18) else {
            panic!("expand overflow");
        };
        a
    }

    fn curve() -> StableCurve {
        let Ok(c) = StableCurve::new(DEFAULT_AMPLIFICATION) else {
            panic!("valid amplification");
        };
        c
    }

    fn dec(v: u8) -> Decimals {
        let Ok(d) = Decimals::new(v) else {
            panic!("valid decimals");
        };
        d
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn rejects_out_of_range_amplification() {
        assert!(StableCurve::new(0).is_err());
        assert!(StableCurve::new(MAX_AMPLIFICATION + 1).is_err());
        assert!(StableCurve::new(MAX_AMPLIFICATION).is_ok());
    }

    #[test]
    fn id_depends_on_amplification() {
        let (Ok(a), Ok(b)) = (StableCurve::new(10), StableCurve::new(200)) else {
            panic!("valid amplification");
        };
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), VolatileCurve.id());
        assert_eq!(a.id(), CurveId::from_label("stable:10"));
    }

    // -- StableSwap math ----------------------------------------------------

    #[test]
    fn compute_d_zero_reserves() {
        assert_eq!(compute_d(U256::ZERO, U256::ZERO, 100), Ok(U256::ZERO));
    }

    #[test]
    fn compute_d_balanced_equals_sum() {
        let x = e18(1_000).get();
        let Ok(d) = compute_d(x, x, 100) else {
            panic!("expected Ok");
        };
        let sum = x + x;
        assert!(d.abs_diff(sum) <= U256::from(2u8), "D = {d}");
    }

    #[test]
    fn compute_d_is_symmetric() {
        let (x, y) = (e18(700).get(), e18(1_300).get());
        assert_eq!(compute_d(x, y, 100), compute_d(y, x, 100));
    }

    #[test]
    fn compute_y_recovers_reserve() {
        let (x, y) = (e18(800).get(), e18(1_200).get());
        let Ok(d) = compute_d(x, y, 100) else {
            panic!("expected Ok");
        };
        let Ok(y_back) = compute_y(x, d, 100) else {
            panic!("expected Ok");
        };
        assert!(y_back.abs_diff(y) <= U256::from(1_000u32), "y = {y_back}");
    }

    // -- Pricing ------------------------------------------------------------

    #[test]
    fn balanced_pool_prices_near_parity() {
        let Ok(out) = curve().amount_out(e18(1), e18(1_000), e18(1_000), Decimals::MAX, Decimals::MAX)
        else {
            panic!("expected Ok");
        };
        assert!(out < e18(1));
        assert!(out > Amount::from(996_000_000_000_000_000u128), "out = {out}");
    }

    #[test]
    fn lower_slippage_than_volatile() {
        let r = e18(100);
        let Ok(stable) = curve().amount_out(e18(10), r, r, Decimals::MAX, Decimals::MAX) else {
            panic!("expected Ok");
        };
        let Ok(volatile) = VolatileCurve.amount_out(e18(10), r, r, Decimals::MAX, Decimals::MAX)
        else {
            panic!("expected Ok");
        };
        assert!(stable > volatile);
    }

    #[test]
    fn mixed_decimals_are_normalised() {
        // 1 000 units each: 6-decimal base, 18-decimal quote
        let reserve_6 = Amount::from(1_000_000_000u64);
        let reserve_18 = e18(1_000);
        let Ok(out) = curve().amount_out(
            Amount::from(1_000_000u64),
            reserve_6,
            reserve_18,
            dec(6),
            Decimals::MAX,
        ) else {
            panic!("expected Ok");
        };
        assert!(out > Amount::from(996_000_000_000_000_000u128), "out = {out}");
        assert!(out < e18(1));

        let Ok(back) = curve().amount_out(e18(1), reserve_18, reserve_6, Decimals::MAX, dec(6))
        else {
            panic!("expected Ok");
        };
        assert!(back > Amount::from(996_000u64) && back < Amount::from(1_000_000u64));
    }

    #[test]
    fn errors_match_volatile() {
        let c = curve();
        let r = e18(10);
        assert_eq!(
            c.amount_out(Amount::ZERO, r, r, Decimals::MAX, Decimals::MAX),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(
            c.amount_in(Amount::ZERO, r, r, Decimals::MAX, Decimals::MAX),
            Err(AmmError::InsufficientOutputAmount)
        );
        assert_eq!(
            c.amount_out(e18(1), Amount::ZERO, r, Decimals::MAX, Decimals::MAX),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            c.amount_in(r, r, r, Decimals::MAX, Decimals::MAX),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn amount_in_is_minimal() {
        let c = curve();
        let r = e18(1_000);
        let target = e18(5);
        let Ok(required) = c.amount_in(target, r, r, Decimals::MAX, Decimals::MAX) else {
            panic!("expected Ok");
        };
        let Ok(got) = c.amount_out(required, r, r, Decimals::MAX, Decimals::MAX) else {
            panic!("expected Ok");
        };
        assert!(got >= target);
        let less = required.saturating_sub(&Amount::from(1u64));
        let Ok(short) = c.amount_out(less, r, r, Decimals::MAX, Decimals::MAX) else {
            panic!("expected Ok");
        };
        assert!(short < target);
    }

    // -- check_invariant ----------------------------------------------------

    fn settle(out: Amount) -> InvariantCheck {
        let (r, input) = (e18(1_000), e18(1));
        InvariantCheck {
            reserve_base: r,
            reserve_quote: r,
            balance_base: r.checked_add(&input).unwrap_or(r),
            balance_quote: r.saturating_sub(&out),
            amount_base_in: input,
            amount_quote_in: Amount::ZERO,
            decimals_base: Decimals::MAX,
            decimals_quote: Decimals::MAX,
        }
    }

    #[test]
    fn check_accepts_quoted_rejects_greedy() {
        let c = curve();
        let r = e18(1_000);
        let Ok(quoted) = c.amount_out(e18(1), r, r, Decimals::MAX, Decimals::MAX) else {
            panic!("expected Ok");
        };
        assert_eq!(c.check_invariant(&settle(quoted)), Ok(()));
        let greedy = quoted.checked_add(&Amount::from(1u64)).unwrap_or(quoted);
        assert_eq!(c.check_invariant(&settle(greedy)), Err(AmmError::K));
    }

    #[test]
    fn k_of_balanced_pool() {
        let r = e18(1_000);
        let Ok(k) = curve().k(r, r, Decimals::MAX, Decimals::MAX) else {
            panic!("expected Ok");
        };
        let expected = r.get() * r.get();
        assert!(k.abs_diff(expected) <= r.get() * U256::from(4u8));
    }
}
