//! Pairs: reserves, liquidity shares, protocol fee and price history of
//! one token pair on one curve.

mod observations;
mod shares;
mod state;


pub use observations::ObservationBuffer;
pub use shares::LiquidityShares;
pub use state::Pair;

use crate::domain::Address;

/// Shares permanently locked by the first mint.
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Holder of the locked [`MINIMUM_LIQUIDITY`] shares.
pub const BURN_ADDRESS: Address = Address::from_low_u64(0xdead);
