//! Token identity type.

use super::{Address, Decimals};

/// A token as seen by a pair: its address plus its decimal precision.
///
/// Two tokens are equal only if both address and decimals match.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::{Address, Decimals, Token};
///
/// let tok = Token::new(Address::from_low_u64(1), Decimals::MAX);
/// assert_eq!(tok.address(), Address::from_low_u64(1));
/// assert_eq!(tok.decimals().get(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    address: Address,
    decimals: Decimals,
}

impl Token {
    /// Creates a new `Token`.
    #[must_use]
    pub const fn new(address: Address, decimals: Decimals) -> Self {
        Self { address, decimals }
    }

    /// Returns the token address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the token decimals.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }
}
