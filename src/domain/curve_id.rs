//! Opaque identifier of a pricing curve.

use core::fmt;

use alloy_primitives::{hex, keccak256};
use serde::{Deserialize, Serialize};

/// Opaque identifier under which a pricing curve is whitelisted on the
/// factory and bound to its pairs.
///
/// Ids are keccak-256 digests of a curve label, so the same curve with
/// the same parameters always maps to the same id.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::CurveId;
///
/// assert_eq!(CurveId::from_label("volatile"), CurveId::from_label("volatile"));
/// assert_ne!(CurveId::from_label("volatile"), CurveId::from_label("stable:100"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurveId([u8; 32]);

impl CurveId {
    /// Creates an id from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derives the id of a curve from its label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self(keccak256(label.as_bytes()).0)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
