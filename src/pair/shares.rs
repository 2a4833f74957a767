//! Liquidity-share ledger of a pair.

use crate::domain::{Address, Amount, Event};
use crate::error::AmmError;
use crate::token::TokenLedger;

/// The pair's own ERC-20 style share token.
///
/// Every balance change emits a [`Event::Transfer`] on the pair's address;
/// mints come from [`Address::ZERO`] and burns go to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityShares {
    pair: Address,
    ledger: TokenLedger,
}

impl LiquidityShares {
    /// Creates an empty share ledger for `pair`.
    #[must_use]
    pub fn new(pair: Address) -> Self {
        Self {
            pair,
            ledger: TokenLedger::new(),
        }
    }

    /// Total outstanding shares.
    pub const fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Shares held by `account`.
    pub fn balance_of(&self, account: Address) -> Amount {
        self.ledger.balance_of(account)
    }

    /// Shares `spender` may move on behalf of `owner`.
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.ledger.allowance(owner, spender)
    }

    fn transfer_event(&self, from: Address, to: Address, amount: Amount) -> Event {
        Event::Transfer {
            token: self.pair,
            from,
            to,
            amount,
        }
    }

    /// Issues `amount` new shares to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the supply would exceed 256 bits.
    pub fn mint(&mut self, to: Address, amount: Amount, events: &mut Vec<Event>) -> Result<(), AmmError> {
        self.ledger.mint(to, amount)?;
        events.push(self.transfer_event(Address::ZERO, to, amount));
        Ok(())
    }

    /// Destroys `amount` shares held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn burn(&mut self, from: Address, amount: Amount, events: &mut Vec<Event>) -> Result<(), AmmError> {
        self.ledger.burn(from, amount)?;
        events.push(self.transfer_event(from, Address::ZERO, amount));
        Ok(())
    }

    /// Moves shares between accounts.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        events: &mut Vec<Event>,
    ) -> Result<(), AmmError> {
        self.ledger.transfer(from, to, amount)?;
        events.push(self.transfer_event(from, to, amount));
        Ok(())
    }

    /// Sets an allowance.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount, events: &mut Vec<Event>) {
        self.ledger.approve(owner, spender, amount);
        events.push(Event::Approval {
            token: self.pair,
            owner,
            spender,
            amount,
        });
    }

    /// Moves shares on behalf of `from`, consuming `spender`'s allowance.
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
        events: &mut Vec<Event>,
    ) -> Result<(), AmmError> {
        self.ledger.transfer_from(spender, from, to, amount)?;
        events.push(self.transfer_event(from, to, amount));
        Ok(())
    }
}
