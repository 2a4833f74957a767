//! Quote computation and trade orchestration.
//!
//! The [`Router`] holds no state of its own.  Its pure helpers price a
//! single hop or a whole [`Route`](crate::domain::Route) chain through the
//! pairs registered in a [`Factory`](crate::factory::Factory); its stateful
//! operations check the caller's deadline, move tokens into the right
//! pairs and call `mint`, `burn` or `swap` on them in order.
//!
//! # Hop execution
//!
//! ```text
//! caller --transfer_from--> pair[0] --swap--> pair[1] --swap--> ... --> to
//! ```
//!
//! Every hop's output is sent straight to the next hop's pair, so
//! intermediate tokens never pass through the caller.

mod params;
mod swap_router;

pub use params::{AddLiquidity, RemoveLiquidity, SwapExactIn, SwapExactOut};
pub use swap_router::Router;
