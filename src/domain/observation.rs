//! Cumulative price samples.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// One entry of a pair's price history.
///
/// Cumulative prices are Q112 fixed-point sums of `price × seconds` that
/// wrap modulo 2^256; only differences between two observations are
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Block timestamp of the sample, in seconds.
    pub timestamp: u64,
    /// Running sum of `quote / base` (Q112) weighted by elapsed seconds.
    pub cumulative_base_price: U256,
    /// Running sum of `base / quote` (Q112) weighted by elapsed seconds.
    pub cumulative_quote_price: U256,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub const fn new(
        timestamp: u64,
        cumulative_base_price: U256,
        cumulative_quote_price: U256,
    ) -> Self {
        Self {
            timestamp,
            cumulative_base_price,
            cumulative_quote_price,
        }
    }
}
