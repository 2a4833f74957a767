//! Fundamental domain value types used throughout the exchange engine.
//!
//! Addresses, amounts, decimals, curve ids, canonical pair keys, routes,
//! price observations and events.  Newtypes with validated constructors
//! enforce their invariants at the boundary.

mod address;
mod amount;
mod curve_id;
mod decimals;
mod event;
mod observation;
mod pair_key;
mod rounding;
mod route;
mod token;

pub use address::Address;
pub use amount::Amount;
pub use curve_id::CurveId;
pub use decimals::Decimals;
pub use event::Event;
pub use observation::Observation;
pub use pair_key::PairKey;
pub use rounding::Rounding;
pub use route::{check_chain, Route};
pub use token::Token;
