//! Explicit rounding direction for integer division.

/// Rounding direction for every division performed on amounts.
///
/// Pricing always rounds in the pool's favour: outputs round
/// [`Down`](Rounding::Down), required inputs round [`Up`](Rounding::Up).
///
/// # Examples
///
/// ```
/// use stark_amm::domain::{Amount, Rounding};
///
/// let seven = Amount::from(7u64);
/// let two = Amount::from(2u64);
/// assert_eq!(seven.checked_div(&two, Rounding::Down), Some(Amount::from(3u64)));
/// assert_eq!(seven.checked_div(&two, Rounding::Up), Some(Amount::from(4u64)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}
