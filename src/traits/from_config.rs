//! Generic construction trait for configuration-driven instantiation.
//!
//! [`FromConfig`] gives curves and the exchange host a uniform way to be
//! built from their configuration structs.  Implementations validate the
//! configuration first, so a successfully constructed value is always in
//! a valid initial state.
//!
//! There is no blanket implementation: every config/target pairing is
//! written out explicitly.

use crate::error::AmmError;

/// Builds `Self` from a configuration value of type `C`.
///
/// # Implementors
///
/// - `impl FromConfig<StableCurveConfig> for StableCurve`
/// - `impl<B> FromConfig<ExchangeConfig> for Exchange<B>`
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] if the configuration
/// violates any of its invariants.
pub trait FromConfig<C>: Sized {
    /// Creates a new instance from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    fn from_config(config: &C) -> Result<Self, AmmError>;
}
