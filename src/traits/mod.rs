//! Core trait abstractions of the exchange engine.
//!
//! - [`PricingCurve`]: the capability contract every curve implements
//!   (amount in/out, invariant value, post-swap invariant check).
//! - [`TokenBank`]: the external ERC-20 style token collaborator.
//! - [`SwapCallee`]: flash-swap callback invoked between the optimistic
//!   transfer and the invariant check.
//! - [`FromConfig`]: configuration-driven construction.

mod from_config;
mod pricing_curve;
mod swap_callee;
mod token_bank;

pub use from_config::FromConfig;
pub use pricing_curve::{InvariantCheck, PricingCurve};
pub use swap_callee::SwapCallee;
pub use token_bank::TokenBank;
