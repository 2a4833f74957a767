//! Declarative, validated configuration.
//!
//! [`ExchangeConfig`] is the top-level blueprint of an
//! [`Exchange`](crate::exchange::Exchange) host and can be loaded from
//! TOML.  [`StableCurveConfig`] parameterises the stable curve.

mod exchange_config;
mod stable;

pub use exchange_config::{ExchangeConfig, DEFAULT_OBSERVATION_CAPACITY};
pub use stable::StableCurveConfig;
