//! Pair creation and registry.
//!
//! The [`Factory`] is the single authority that instantiates pairs.  It
//! canonicalises `(token A, token B, curve)` keys, refuses duplicates and
//! curves that governance has not whitelisted, and keeps every pair it
//! created in insertion order for enumeration.
//!
//! # Governance
//!
//! One account, the fee-to setter, controls the curve whitelist and the
//! protocol-fee recipient.  The role can be handed over exactly once per
//! call and the previous holder loses it immediately.
//!
//! # Pair access
//!
//! Pairs are owned by the factory and addressed by their deterministic
//! [`Address`](crate::domain::Address).  Liquidity and swap operations can
//! be invoked through the factory, which supplies the current protocol-fee
//! recipient to the pair.

mod registry;

pub use registry::Factory;
