//! Balance and allowance book of one token.

use std::collections::HashMap;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balances, allowances and total supply of a single token.
///
/// An allowance of [`Amount::MAX`] is treated as unlimited and is never
/// decremented.  Zero balances are removed from the map, so two ledgers
/// with the same visible state compare equal.
///
/// # Examples
///
/// ```
/// use stark_amm::domain::{Address, Amount};
/// use stark_amm::token::TokenLedger;
///
/// let alice = Address::from_low_u64(1);
/// let bob = Address::from_low_u64(2);
///
/// let mut ledger = TokenLedger::new();
/// ledger.mint(alice, Amount::from(100u64)).expect("mint");
/// ledger.transfer(alice, bob, Amount::from(40u64)).expect("transfer");
/// assert_eq!(ledger.balance_of(bob), Amount::from(40u64));
/// assert_eq!(ledger.total_supply(), Amount::from(100u64));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl TokenLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total outstanding supply.
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Allowance of `spender` over `owner`'s balance.
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    /// Creates `amount` new units owned by `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the supply would exceed 256 bits.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<(), AmmError> {
        let supply = self.total_supply.safe_add(&amount)?;
        let balance = self.balance_of(to).safe_add(&amount)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Destroys `amount` units owned by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn burn(&mut self, from: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.total_supply = self.total_supply.safe_sub(&amount)?;
        self.set_balance(from, balance);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        let from_balance = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.set_balance(from, from_balance);
        let to_balance = self.balance_of(to).safe_add(&amount)?;
        self.set_balance(to, to_balance);
        Ok(())
    }

    /// Sets the allowance of `spender` over `owner`'s balance.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too low.
    /// - [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let allowance = self.allowance(from, spender);
        if allowance != Amount::MAX {
            let remaining = allowance
                .checked_sub(&amount)
                .ok_or(AmmError::InsufficientAllowance)?;
            self.transfer(from, to, amount)?;
            self.approve(from, spender, remaining);
            return Ok(());
        }
        self.transfer(from, to, amount)
    }
}
