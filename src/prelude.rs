//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use stark_amm::prelude::*;
//! ```

pub use crate::config::{ExchangeConfig, StableCurveConfig};
pub use crate::context::CallContext;
pub use crate::curves::{quote, CurveKind, StableCurve, VolatileCurve};
pub use crate::domain::{Address, Amount, CurveId, Decimals, Event, Observation, PairKey, Rounding, Route, Token};
pub use crate::error::{AmmError, Result};
pub use crate::exchange::{Exchange, SharedExchange};
pub use crate::factory::Factory;
pub use crate::pair::{Pair, BURN_ADDRESS, MINIMUM_LIQUIDITY};
pub use crate::router::{AddLiquidity, RemoveLiquidity, Router, SwapExactIn, SwapExactOut};
pub use crate::token::InMemoryTokenBank;
pub use crate::traits::{FromConfig, PricingCurve, SwapCallee, TokenBank};
