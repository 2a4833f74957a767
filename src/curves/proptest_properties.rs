//! Property-based tests using `proptest` for curve invariants.
//!
//! 1. **Monotonic output**: more input never yields less output, and the
//!    output always stays below the output reserve.
//! 2. **Exact-output coverage**: paying `amount_in(y)` yields at least `y`.
//! 3. **Invariant growth**: settling a quoted swap passes the curve's
//!    post-swap check and never shrinks `x · y` on the volatile curve.
//! 4. **Quote rounding**: the proportional quote never over-pays.

use proptest::prelude::*;

use super::{quote, CurveKind, StableCurve, VolatileCurve};
use crate::domain::{Amount, Decimals};
use crate::traits::{InvariantCheck, PricingCurve};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn curves() -> [CurveKind; 2] {
    let Ok(stable) = StableCurve::new(100) else {
        panic!("valid amplification");
    };
    [CurveKind::from(VolatileCurve::new()), CurveKind::from(stable)]
}

fn d18() -> Decimals {
    Decimals::MAX
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves between 10^12 and 10^27 raw units.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000_000_000u128..=1_000_000_000_000_000_000_000_000_000u128
}

/// A reserve pair whose ratio stays within 1:10 and 10:1.
fn reserve_pair_strategy() -> impl Strategy<Value = (u128, u128)> {
    (reserve_strategy(), 10u128..=1_000u128).prop_map(|(r, pct)| (r, r / 100 * pct))
}

/// Trade size as a fraction of the input reserve, in basis points.
fn fraction_strategy() -> impl Strategy<Value = u128> {
    10u128..=5_000u128
}

// ---------------------------------------------------------------------------
// Property 1: Monotonic output
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_amount_out_monotonic_and_bounded(
        (r_in, r_out) in reserve_pair_strategy(),
        frac in fraction_strategy(),
    ) {
        let small = Amount::from((r_in * frac / 10_000).max(1));
        let large = Amount::from((r_in * frac / 5_000).max(2));
        for curve in curves() {
            let (Ok(out_small), Ok(out_large)) = (
                curve.amount_out(small, Amount::from(r_in), Amount::from(r_out), d18(), d18()),
                curve.amount_out(large, Amount::from(r_in), Amount::from(r_out), d18(), d18()),
            ) else {
                return Ok(());
            };
            prop_assert!(out_small <= out_large, "{}: {} > {}", curve.name(), out_small, out_large);
            prop_assert!(out_large < Amount::from(r_out));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Exact-output coverage
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_amount_in_covers_requested_output(
        (r_in, r_out) in reserve_pair_strategy(),
        frac in fraction_strategy(),
    ) {
        let wanted = Amount::from((r_out * frac / 10_000).max(1));
        for curve in curves() {
            let Ok(required) =
                curve.amount_in(wanted, Amount::from(r_in), Amount::from(r_out), d18(), d18())
            else {
                return Ok(());
            };
            let Ok(received) =
                curve.amount_out(required, Amount::from(r_in), Amount::from(r_out), d18(), d18())
            else {
                return Ok(());
            };
            prop_assert!(received >= wanted, "{}: {} < {}", curve.name(), received, wanted);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Invariant growth
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quoted_swap_preserves_invariant(
        (rb, rq) in reserve_pair_strategy(),
        frac in fraction_strategy(),
    ) {
        let input = Amount::from((rb * frac / 10_000).max(1));
        let (rb, rq) = (Amount::from(rb), Amount::from(rq));
        for curve in curves() {
            let Ok(out) = curve.amount_out(input, rb, rq, d18(), d18()) else {
                return Ok(());
            };
            let (Some(bb), Some(bq)) = (rb.checked_add(&input), rq.checked_sub(&out)) else {
                return Ok(());
            };
            let check = InvariantCheck {
                reserve_base: rb,
                reserve_quote: rq,
                balance_base: bb,
                balance_quote: bq,
                amount_base_in: input,
                amount_quote_in: Amount::ZERO,
                decimals_base: d18(),
                decimals_quote: d18(),
            };
            prop_assert_eq!(curve.check_invariant(&check), Ok(()));

            if let CurveKind::Volatile(_) = curve {
                let (Some(before), Some(after)) = (rb.checked_mul(&rq), bb.checked_mul(&bq)) else {
                    return Ok(());
                };
                prop_assert!(after >= before);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Quote rounding
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quote_rounds_down(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amount in 1u128..=1_000_000_000_000_000_000u128,
    ) {
        let Ok(b) = quote(Amount::from(amount), Amount::from(ra), Amount::from(rb)) else {
            return Ok(());
        };
        let (Some(lhs), Some(rhs)) = (
            b.checked_mul(&Amount::from(ra)),
            Amount::from(amount).checked_mul(&Amount::from(rb)),
        ) else {
            return Ok(());
        };
        prop_assert!(lhs <= rhs);
    }
}
