//! Swap route hops.

use serde::{Deserialize, Serialize};

use super::{Address, CurveId};
use crate::error::AmmError;

/// A single swap hop: sell `from` for `to` through the pair bound to
/// `curve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Input token of the hop.
    pub from: Address,
    /// Output token of the hop.
    pub to: Address,
    /// Curve of the pair used for the hop.
    pub curve: CurveId,
}

impl Route {
    /// Creates a new hop.
    #[must_use]
    pub const fn new(from: Address, to: Address, curve: CurveId) -> Self {
        Self { from, to, curve }
    }
}

/// Checks that `routes` is a non-empty chain where every hop's output is
/// the next hop's input.
///
/// # Errors
///
/// Returns [`AmmError::InvalidPath`] otherwise.
pub fn check_chain(routes: &[Route]) -> Result<(), AmmError> {
    if routes.is_empty() {
        return Err(AmmError::InvalidPath);
    }
    if routes.windows(2).any(|w| w[0].to != w[1].from) {
        return Err(AmmError::InvalidPath);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hop(a: u64, b: u64) -> Route {
        Route::new(
            Address::from_low_u64(a),
            Address::from_low_u64(b),
            CurveId::from_label("volatile"),
        )
    }

    #[test]
    fn empty_is_invalid() {
        assert_eq!(check_chain(&[]), Err(AmmError::InvalidPath));
    }

    #[test]
    fn chained_hops_pass() {
        assert_eq!(check_chain(&[hop(1, 2), hop(2, 3)]), Ok(()));
    }

    #[test]
    fn broken_chain_fails() {
        assert_eq!(check_chain(&[hop(1, 2), hop(3, 4)]), Err(AmmError::InvalidPath));
    }
}
