//! Chain-agnostic account / contract address.

use core::fmt;

use alloy_primitives::{hex, keccak256};
use serde::{Deserialize, Serialize};

/// A 32-byte address identifying an account, a token, a pair, or the
/// router.
///
/// All 32-byte sequences are valid, so construction is infallible.
/// Ordering is lexicographic on the big-endian bytes, which is the
/// numeric ordering used to canonicalise pair keys.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::Address;
///
/// let a = Address::from_low_u64(1);
/// let b = Address::from_low_u64(2);
/// assert!(a < b);
/// assert!(Address::ZERO.is_zero());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// The all-zero address: mint source, burn sink and "unset" sentinel.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates an address whose low 8 bytes hold `value` big-endian.
    #[must_use]
    pub const fn from_low_u64(value: u64) -> Self {
        let be = value.to_be_bytes();
        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Derives a deterministic address from arbitrary seed bytes
    /// (keccak-256 of the seed).
    #[must_use]
    pub fn derive(seed: &[u8]) -> Self {
        Self(keccak256(seed).0)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` for the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
