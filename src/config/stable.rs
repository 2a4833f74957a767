//! Configuration of the StableSwap curve.

use serde::{Deserialize, Serialize};

use crate::curves::{StableCurve, DEFAULT_AMPLIFICATION, MAX_AMPLIFICATION, MIN_AMPLIFICATION};
use crate::error::AmmError;
use crate::traits::FromConfig;

/// Parameters of the [`StableCurve`].
///
/// # Amplification Parameter
///
/// The `amplification` parameter (`A`) controls the curve shape:
///
/// - `A = 1`: close to constant product
/// - `A → ∞`: approaches constant sum (1:1 swaps)
/// - Typical range for pegged pairs: 50 to 5000
///
/// # Validation
///
/// Amplification must lie in `1..=10_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StableCurveConfig {
    amplification: u64,
}

impl StableCurveConfig {
    /// Creates a new `StableCurveConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `amplification` is
    /// out of range.
    pub fn new(amplification: u64) -> Result<Self, AmmError> {
        let config = Self { amplification };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `amplification` is
    /// out of range.
    pub const fn validate(&self) -> Result<(), AmmError> {
        if self.amplification < MIN_AMPLIFICATION || self.amplification > MAX_AMPLIFICATION {
            return Err(AmmError::InvalidConfiguration(
                "amplification must be in 1..=10000",
            ));
        }
        Ok(())
    }

    /// Returns the amplification coefficient.
    #[must_use]
    pub const fn amplification(&self) -> u64 {
        self.amplification
    }

    /// Builds the configured curve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the config is invalid.
    pub fn curve(&self) -> Result<StableCurve, AmmError> {
        StableCurve::from_config(self)
    }
}

impl Default for StableCurveConfig {
    fn default() -> Self {
        Self {
            amplification: DEFAULT_AMPLIFICATION,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = StableCurveConfig::default();
        assert_eq!(cfg.amplification(), DEFAULT_AMPLIFICATION);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_amplification() {
        let Err(AmmError::InvalidConfiguration(_)) = StableCurveConfig::new(0) else {
            panic!("expected InvalidConfiguration");
        };
    }

    #[test]
    fn builds_curve() {
        let Ok(cfg) = StableCurveConfig::new(250) else {
            panic!("expected Ok");
        };
        let Ok(curve) = cfg.curve() else {
            panic!("expected Ok");
        };
        assert_eq!(curve.amplification(), 250);
    }
}
