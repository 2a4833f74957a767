//! Arithmetic utilities for exchange calculations.
//!
//! [`CheckedArithmetic`] turns the `Option`-returning operations of
//! [`Amount`](crate::domain::Amount) into `Result`s with specific error
//! variants, [`mul_div`] computes `a × b / d` with explicit rounding, and
//! [`isqrt`] is the integer square root used for liquidity shares and
//! protocol-fee accrual.

mod checked;
mod sqrt;

pub use checked::{mul_div, CheckedArithmetic};
pub use sqrt::isqrt;
