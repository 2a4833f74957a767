//! Unified error types for the exchange engine.
//!
//! Every fallible operation in the crate returns [`AmmError`].  A failure
//! always rejects the whole call: the [`Exchange`](crate::exchange::Exchange)
//! host discards every state change made by a call that returns `Err`.
//!
//! Integrators branch on the variant directly or on the stable identifier
//! returned by [`AmmError::code`].

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = AmmError> = core::result::Result<T, E>;

/// All errors produced by the exchange engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// A quoted amount is zero.
    #[error("insufficient amount")]
    InsufficientAmount,

    /// A reserve is zero, or a requested output reaches the reserve.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A swap received no input, or a curve was asked to price zero input.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// A swap requested no output, or a router output fell below its minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// Router deposit of the first token fell below the caller's minimum.
    #[error("insufficient A amount")]
    InsufficientAAmount,

    /// Router deposit of the second token fell below the caller's minimum.
    #[error("insufficient B amount")]
    InsufficientBAmount,

    /// Router input required for an exact output exceeds the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// A route is empty, broken, or names a hop with no registered pair.
    #[error("invalid path")]
    InvalidPath,

    /// A pair already exists for the canonical key.
    #[error("pair exists")]
    PairExists,

    /// No pair is registered at the given address or key.
    #[error("pair not found")]
    PairNotFound,

    /// Both sides of a pair are the same token.
    #[error("identical addresses")]
    IdenticalAddresses,

    /// The zero address was supplied where a real account is required.
    #[error("zero address")]
    ZeroAddress,

    /// Swap output recipient is one of the pair's own tokens.
    #[error("invalid recipient")]
    InvalidTo,

    /// The curve id has not been whitelisted on the factory.
    #[error("curve not allowed")]
    CurveNotAllowed,

    /// Governance-only call made by a non-governance account.
    #[error("forbidden")]
    Forbidden,

    /// The curve invariant decreased across a swap.
    #[error("invariant violated (K)")]
    K,

    /// Router deadline is earlier than the current block timestamp.
    #[error("expired")]
    Expired,

    /// A mint would create zero liquidity shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A burn would return zero of either token.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// The token collaborator does not know this token.
    #[error("unknown token")]
    UnknownToken,

    /// A token is already deployed at this address.
    #[error("token exists")]
    TokenExists,

    /// A token or share transfer exceeds the sender's balance.
    #[error("transfer amount exceeds balance")]
    InsufficientBalance,

    /// A delegated transfer exceeds the approved allowance.
    #[error("transfer amount exceeds allowance")]
    InsufficientAllowance,

    /// Fewer than two distinct-time observations are available.
    #[error("insufficient observations")]
    InsufficientObservations,

    /// Arithmetic overflow.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Stable-curve Newton-Raphson iteration did not converge.
    #[error("newton-raphson did not converge: {0}")]
    NewtonRaphsonNonConvergence(&'static str),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Token decimals outside the supported range.
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),

    /// Configuration text could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(String),
}

impl AmmError {
    /// Returns the stable, matchable identifier for this error kind.
    ///
    /// Identifiers never change between releases, unlike the
    /// human-readable `Display` text.
    ///
    /// # Examples
    ///
    /// ```
    /// use stark_amm::error::AmmError;
    ///
    /// assert_eq!(AmmError::K.code(), "K");
    /// assert_eq!(AmmError::PairExists.code(), "PAIR_EXISTS");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientAmount => "INSUFFICIENT_AMOUNT",
            Self::InsufficientLiquidity => "INSUFFICIENT_LIQUIDITY",
            Self::InsufficientInputAmount => "INSUFFICIENT_INPUT_AMOUNT",
            Self::InsufficientOutputAmount => "INSUFFICIENT_OUTPUT_AMOUNT",
            Self::InsufficientAAmount => "INSUFFICIENT_A_AMOUNT",
            Self::InsufficientBAmount => "INSUFFICIENT_B_AMOUNT",
            Self::ExcessiveInputAmount => "EXCESSIVE_INPUT_AMOUNT",
            Self::InvalidPath => "INVALID_PATH",
            Self::PairExists => "PAIR_EXISTS",
            Self::PairNotFound => "PAIR_NOT_FOUND",
            Self::IdenticalAddresses => "IDENTICAL_ADDRESSES",
            Self::ZeroAddress => "ZERO_ADDRESS",
            Self::InvalidTo => "INVALID_TO",
            Self::CurveNotAllowed => "CURVE_NOT_ALLOWED",
            Self::Forbidden => "FORBIDDEN",
            Self::K => "K",
            Self::Expired => "EXPIRED",
            Self::InsufficientLiquidityMinted => "INSUFFICIENT_LIQUIDITY_MINTED",
            Self::InsufficientLiquidityBurned => "INSUFFICIENT_LIQUIDITY_BURNED",
            Self::UnknownToken => "UNKNOWN_TOKEN",
            Self::TokenExists => "TOKEN_EXISTS",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance => "INSUFFICIENT_ALLOWANCE",
            Self::InsufficientObservations => "INSUFFICIENT_OBSERVATIONS",
            Self::Overflow(_) => "OVERFLOW",
            Self::Underflow(_) => "UNDERFLOW",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::NewtonRaphsonNonConvergence(_) => "NON_CONVERGENCE",
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            Self::InvalidPrecision(_) => "INVALID_PRECISION",
            Self::ConfigParse(_) => "CONFIG_PARSE",
        }
    }
}
