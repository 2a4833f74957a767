//! In-memory implementation of the token collaborator.

use std::collections::HashMap;

use tracing::debug;

use super::TokenLedger;
use crate::domain::{Address, Amount, Decimals};
use crate::error::AmmError;
use crate::traits::TokenBank;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenEntry {
    decimals: Decimals,
    ledger: TokenLedger,
}

/// A set of ERC-20 style tokens held in memory.
///
/// Cloning the bank snapshots every balance, which is how the
/// [`Exchange`](crate::exchange::Exchange) host rolls back failed calls.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::{Address, Amount, Decimals};
/// use stark_amm::token::InMemoryTokenBank;
/// use stark_amm::traits::TokenBank;
///
/// let token = Address::from_low_u64(0xa);
/// let alice = Address::from_low_u64(1);
///
/// let mut bank = InMemoryTokenBank::new();
/// bank.deploy(token, Decimals::MAX, Amount::from(1_000u64), alice)
///     .expect("fresh token");
/// assert_eq!(bank.balance_of(token, alice), Ok(Amount::from(1_000u64)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryTokenBank {
    tokens: HashMap<Address, TokenEntry>,
}

impl InMemoryTokenBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new token and mints `initial_supply` to `recipient`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAddress`] if `token` is the zero address.
    /// - [`AmmError::TokenExists`] if `token` is already deployed.
    pub fn deploy(
        &mut self,
        token: Address,
        decimals: Decimals,
        initial_supply: Amount,
        recipient: Address,
    ) -> Result<(), AmmError> {
        if token.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        if self.tokens.contains_key(&token) {
            return Err(AmmError::TokenExists);
        }
        let mut ledger = TokenLedger::new();
        ledger.mint(recipient, initial_supply)?;
        self.tokens.insert(token, TokenEntry { decimals, ledger });
        debug!(%token, decimals = decimals.get(), %initial_supply, "token deployed");
        Ok(())
    }

    /// Mints additional units of an existing token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownToken`] if `token` was never deployed.
    /// - [`AmmError::Overflow`] if the supply would exceed 256 bits.
    pub fn mint(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.ledger_mut(token)?.mint(to, amount)
    }

    fn entry(&self, token: Address) -> Result<&TokenEntry, AmmError> {
        self.tokens.get(&token).ok_or(AmmError::UnknownToken)
    }

    fn ledger_mut(&mut self, token: Address) -> Result<&mut TokenLedger, AmmError> {
        self.tokens
            .get_mut(&token)
            .map(|e| &mut e.ledger)
            .ok_or(AmmError::UnknownToken)
    }
}

impl TokenBank for InMemoryTokenBank {
    fn decimals(&self, token: Address) -> Result<Decimals, AmmError> {
        Ok(self.entry(token)?.decimals)
    }

    fn total_supply(&self, token: Address) -> Result<Amount, AmmError> {
        Ok(self.entry(token)?.ledger.total_supply())
    }

    fn balance_of(&self, token: Address, account: Address) -> Result<Amount, AmmError> {
        Ok(self.entry(token)?.ledger.balance_of(account))
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.ledger_mut(token)?.transfer(from, to, amount)
    }

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.ledger_mut(token)?.approve(owner, spender, amount);
        Ok(())
    }

    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Amount, AmmError> {
        Ok(self.entry(token)?.ledger.allowance(owner, spender))
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.ledger_mut(token)?
            .transfer_from(spender, from, to, amount)
    }
}
