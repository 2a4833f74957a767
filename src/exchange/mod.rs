//! The call host.
//!
//! Pairs, the factory and the router assume every externally invoked
//! operation runs to completion with all-or-nothing effects.  The
//! [`Exchange`] provides exactly that on top of any cloneable
//! [`TokenBank`](crate::traits::TokenBank): each call works on a snapshot
//! that is committed on success and dropped on failure.  It also keeps the
//! block clock and the ordered event log.
//!
//! [`SharedExchange`] adds an exclusive lock for hosts that serve calls
//! from several threads.

mod host;
mod shared;

pub use host::Exchange;
pub use shared::SharedExchange;
