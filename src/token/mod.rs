//! In-memory ERC-20 style token accounting.
//!
//! [`TokenLedger`] is a single token's balance and allowance book; it is
//! used both by [`InMemoryTokenBank`] for the traded assets and by each
//! pair for its own liquidity shares.

mod bank;
mod ledger;

pub use bank::InMemoryTokenBank;
pub use ledger::TokenLedger;
