//! Observable state-change events.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, CurveId};

/// An event emitted by a pair, the factory, or a liquidity-share ledger.
///
/// Events of one call are appended in the exact order the state changes
/// happen, so a mint yields its share `Transfer`s, then `Sync`, then
/// `Mint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Liquidity shares moved on the ledger of pair `token`.
    /// Mints come from [`Address::ZERO`] and burns go to it.
    Transfer {
        /// Pair whose share ledger changed.
        token: Address,
        /// Sender.
        from: Address,
        /// Recipient.
        to: Address,
        /// Shares moved.
        amount: Amount,
    },
    /// Share allowance set on the ledger of pair `token`.
    Approval {
        /// Pair whose share ledger changed.
        token: Address,
        /// Owner of the shares.
        owner: Address,
        /// Approved spender.
        spender: Address,
        /// New allowance.
        amount: Amount,
    },
    /// Reserves were re-synchronised with balances.
    Sync {
        /// Pair address.
        pair: Address,
        /// New base reserve.
        reserve_base: Amount,
        /// New quote reserve.
        reserve_quote: Amount,
    },
    /// Liquidity was added.
    Mint {
        /// Pair address.
        pair: Address,
        /// Caller of `mint`.
        sender: Address,
        /// Base tokens deposited.
        amount_base: Amount,
        /// Quote tokens deposited.
        amount_quote: Amount,
    },
    /// Liquidity was removed.
    Burn {
        /// Pair address.
        pair: Address,
        /// Caller of `burn`.
        sender: Address,
        /// Base tokens withdrawn.
        amount_base: Amount,
        /// Quote tokens withdrawn.
        amount_quote: Amount,
        /// Recipient of the withdrawn tokens.
        to: Address,
    },
    /// A swap settled.
    Swap {
        /// Pair address.
        pair: Address,
        /// Caller of `swap`.
        sender: Address,
        /// Base tokens received by the pair.
        base_in: Amount,
        /// Quote tokens received by the pair.
        quote_in: Amount,
        /// Base tokens sent out.
        base_out: Amount,
        /// Quote tokens sent out.
        quote_out: Amount,
        /// Recipient of the output.
        to: Address,
    },
    /// The factory registered a new pair.
    PairCreated {
        /// Smaller token address.
        base: Address,
        /// Larger token address.
        quote: Address,
        /// Curve the pair is bound to.
        curve: CurveId,
        /// Address of the new pair.
        pair: Address,
        /// `all_pairs_length()` after registration.
        count: usize,
    },
}
