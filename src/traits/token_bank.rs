//! External token collaborator.
//!
//! The engine never stores token balances itself: it reads them from a
//! [`TokenBank`] and moves them with `transfer` / `transfer_from`.  Pairs
//! compute deposits and withdrawals from balance deltas, never from the
//! return value of a transfer.

use crate::domain::{Address, Amount, Decimals};
use crate::error::AmmError;

/// ERC-20 style token ledger keyed by token address.
///
/// # Errors
///
/// Every method fails with [`AmmError::UnknownToken`] if `token` is not
/// known to the bank.
pub trait TokenBank {
    /// Decimal places of `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`].
    fn decimals(&self, token: Address) -> Result<Decimals, AmmError>;

    /// Total minted supply of `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`].
    fn total_supply(&self, token: Address) -> Result<Amount, AmmError>;

    /// Balance of `account` in `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`].
    fn balance_of(&self, token: Address, account: Address) -> Result<Amount, AmmError>;

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownToken`].
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `amount`.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Sets the allowance of `spender` over `owner`'s `token` balance.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`].
    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Remaining allowance of `spender` over `owner`'s `token` balance.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`].
    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Amount, AmmError>;

    /// Moves `amount` of `token` from `from` to `to` on behalf of
    /// `spender`, consuming allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownToken`].
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too low.
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `amount`.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;
}
