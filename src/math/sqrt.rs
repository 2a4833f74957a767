//! Integer square root.

use alloy_primitives::U256;

/// Floor of the square root of `n` (Babylonian / Newton iteration).
///
/// The iteration starts at `n / 2 + 1`, which is at least the root for
/// every `n >= 1`, and decreases monotonically until it stops moving.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use stark_amm::math::isqrt;
///
/// assert_eq!(isqrt(U256::from(16u8)), U256::from(4u8));
/// assert_eq!(isqrt(U256::from(17u8)), U256::from(4u8));
/// ```
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }
    if n < U256::from(4u8) {
        return U256::from(1u8);
    }
    let mut x = n;
    let mut y = (n >> 1) + U256::from(1u8);
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values() {
        let expected = [0u8, 1, 1, 1, 2, 2, 2, 2, 2, 3];
        for (n, root) in expected.iter().enumerate() {
            assert_eq!(isqrt(U256::from(n)), U256::from(*root), "isqrt({n})");
        }
    }

    #[test]
    fn perfect_square_of_eighteen_decimals() {
        let a = U256::from(1_000_000_000_000_000_000u128);
        let b = U256::from(4_000_000_000_000_000_000u128);
        assert_eq!(isqrt(a * b), U256::from(2_000_000_000_000_000_000u128));
    }

    #[test]
    fn max_value() {
        let root = isqrt(U256::MAX);
        assert_eq!(root, U256::from(u128::MAX));
    }

    #[test]
    fn floors_between_squares() {
        let n = U256::from(10_000u32) * U256::from(10_000u32) - U256::from(1u8);
        assert_eq!(isqrt(n), U256::from(9_999u32));
    }
}
