//! Top-level exchange configuration.

use serde::{Deserialize, Serialize};

use super::StableCurveConfig;
use crate::error::AmmError;

/// Default number of price observations kept per pair.
pub const DEFAULT_OBSERVATION_CAPACITY: usize = 64;

/// Configuration of an [`Exchange`](crate::exchange::Exchange) host.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
///
/// # Examples
///
/// ```
/// use stark_amm::config::ExchangeConfig;
///
/// let cfg = ExchangeConfig::from_toml_str(
///     r#"
///     observation_capacity = 16
///
///     [stable]
///     amplification = 200
///     "#,
/// )
/// .expect("valid config");
/// assert_eq!(cfg.observation_capacity(), 16);
/// assert_eq!(cfg.stable().amplification(), 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeConfig {
    observation_capacity: usize,
    whitelist_default_curves: bool,
    stable: StableCurveConfig,
}

impl ExchangeConfig {
    /// Creates a new `ExchangeConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if any field is invalid.
    pub fn new(
        observation_capacity: usize,
        whitelist_default_curves: bool,
        stable: StableCurveConfig,
    ) -> Result<Self, AmmError> {
        let config = Self {
            observation_capacity,
            whitelist_default_curves,
            stable,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ConfigParse`] if the text is not valid TOML for this
    ///   structure.
    /// - [`AmmError::InvalidConfiguration`] if a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, AmmError> {
        let config: Self =
            toml::from_str(text).map_err(|e| AmmError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ConfigParse`] if serialisation fails.
    pub fn to_toml_string(&self) -> Result<String, AmmError> {
        toml::to_string(self).map_err(|e| AmmError::ConfigParse(e.to_string()))
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `observation_capacity` is
    ///   zero or the stable curve parameters are out of range.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.observation_capacity == 0 {
            return Err(AmmError::InvalidConfiguration(
                "observation_capacity must be greater than zero",
            ));
        }
        self.stable.validate()
    }

    /// Number of price observations kept per pair.
    #[must_use]
    pub const fn observation_capacity(&self) -> usize {
        self.observation_capacity
    }

    /// Whether the host whitelists the volatile curve and the configured
    /// stable curve at start-up.
    #[must_use]
    pub const fn whitelist_default_curves(&self) -> bool {
        self.whitelist_default_curves
    }

    /// Stable curve parameters.
    #[must_use]
    pub const fn stable(&self) -> &StableCurveConfig {
        &self.stable
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            observation_capacity: DEFAULT_OBSERVATION_CAPACITY,
            whitelist_default_curves: true,
            stable: StableCurveConfig::default(),
        }
    }
}
