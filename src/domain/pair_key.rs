//! Canonical registry key of a pair.

use super::{Address, CurveId};
use crate::error::AmmError;

/// `(token A, token B, curve)` canonicalised so that `(A, B)` and `(B, A)`
/// resolve to the same key.
///
/// The smaller address becomes `base`, the larger `quote`.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::{Address, CurveId, PairKey};
///
/// let curve = CurveId::from_label("volatile");
/// let a = Address::from_low_u64(7);
/// let b = Address::from_low_u64(3);
///
/// let key = PairKey::new(a, b, curve).expect("distinct tokens");
/// assert_eq!(key.base(), b);
/// assert_eq!(key.quote(), a);
/// assert_eq!(key, PairKey::new(b, a, curve).expect("distinct tokens"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    base: Address,
    quote: Address,
    curve: CurveId,
}

impl PairKey {
    /// Creates a canonically-ordered key.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if both tokens are the same.
    /// - [`AmmError::ZeroAddress`] if either token is the zero address.
    pub fn new(token_a: Address, token_b: Address, curve: CurveId) -> Result<Self, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAddresses);
        }
        let (base, quote) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        if base.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        Ok(Self { base, quote, curve })
    }

    /// Returns the smaller token address.
    #[must_use]
    pub const fn base(&self) -> Address {
        self.base
    }

    /// Returns the larger token address.
    #[must_use]
    pub const fn quote(&self) -> Address {
        self.quote
    }

    /// Returns the curve id.
    #[must_use]
    pub const fn curve(&self) -> CurveId {
        self.curve
    }

    /// Deterministic address of the pair registered under this key.
    #[must_use]
    pub fn pair_address(&self) -> Address {
        let mut seed = [0u8; 96];
        seed[..32].copy_from_slice(self.base.as_bytes());
        seed[32..64].copy_from_slice(self.quote.as_bytes());
        seed[64..].copy_from_slice(self.curve.as_bytes());
        Address::derive(&seed)
    }
}
