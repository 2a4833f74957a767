//! # Stark AMM
//!
//! Automated market maker engine: a factory that registers token pairs,
//! pairs that hold pooled reserves and issue liquidity shares, two
//! pricing curves behind one capability contract, and a router that
//! prices and executes multi-hop trades.
//!
//! - **Volatile** curve: constant product `x · y = k` with a 0.3% input fee.
//! - **Stable** curve: two-asset StableSwap invariant with a configurable
//!   amplification constant, for similarly priced assets.
//!
//! Every quantity is an unsigned 256-bit integer; no floating point is used
//! anywhere in the math.
//!
//! # Quick Start
//!
//! ```rust
//! use stark_amm::config::ExchangeConfig;
//! use stark_amm::curves::VolatileCurve;
//! use stark_amm::domain::{Address, Amount, Decimals, Route};
//! use stark_amm::exchange::Exchange;
//! use stark_amm::router::{AddLiquidity, SwapExactIn};
//! use stark_amm::token::InMemoryTokenBank;
//! use stark_amm::traits::PricingCurve;
//!
//! let alice = Address::from_low_u64(1);
//! let usdc = Address::from_low_u64(0xa);
//! let weth = Address::from_low_u64(0xb);
//!
//! // 1. A host with the default curves whitelisted, and two tokens
//! let mut ex = Exchange::new(alice, InMemoryTokenBank::new(), &ExchangeConfig::default())
//!     .expect("valid config");
//! for token in [usdc, weth] {
//!     ex.bank_mut()
//!         .deploy(token, Decimals::MAX, Amount::from(1_000_000u64), alice)
//!         .expect("fresh token");
//!     ex.approve(alice, token, ex.router().address(), Amount::MAX)
//!         .expect("approved");
//! }
//!
//! // 2. Provide liquidity; the pair is created on the fly
//! let volatile = VolatileCurve::new().id();
//! let (_, _, shares) = ex
//!     .add_liquidity(alice, &AddLiquidity {
//!         token_a: usdc,
//!         token_b: weth,
//!         curve: volatile,
//!         amount_a_desired: Amount::from(10_000u64),
//!         amount_b_desired: Amount::from(10_000u64),
//!         amount_a_min: Amount::ZERO,
//!         amount_b_min: Amount::ZERO,
//!         to: alice,
//!         deadline: 0,
//!     })
//!     .expect("liquidity added");
//! assert_eq!(shares, Amount::from(9_000u64));
//!
//! // 3. Swap through the router
//! let amounts = ex
//!     .swap_exact_tokens_for_tokens(alice, &SwapExactIn {
//!         amount_in: Amount::from(1_000u64),
//!         amount_out_min: Amount::ZERO,
//!         routes: vec![Route::new(usdc, weth, volatile)],
//!         to: alice,
//!         deadline: 0,
//!     })
//!     .expect("swap succeeded");
//! assert_eq!(amounts, vec![Amount::from(1_000u64), Amount::from(906u64)]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Exchange   │  snapshot / commit per call, clock, event log
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐
//! │    Router    │────▶│   Factory    │  registry, curve whitelist, fee governance
//! └──────┬──────┘     └──────┬──────┘
//!        │                   │ owns
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │    Curves    │◀────│    Pairs     │  reserves, shares, protocol fee, TWAP
//! └─────────────┘     └──────┬──────┘
//!                            │ TokenBank
//!                            ▼
//!                     ┌─────────────┐
//!                     │    Tokens    │  external ERC-20 style collaborator
//!                     └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Address`](domain::Address), [`CurveId`](domain::CurveId), [`Event`](domain::Event), etc. |
//! | [`traits`] | Seams: [`PricingCurve`](traits::PricingCurve), [`TokenBank`](traits::TokenBank), [`SwapCallee`](traits::SwapCallee), [`FromConfig`](traits::FromConfig) |
//! | [`curves`] | Volatile and stable curves and the [`CurveKind`](curves::CurveKind) dispatch enum |
//! | [`pair`] | The [`Pair`](pair::Pair) state machine |
//! | [`factory`] | The [`Factory`](factory::Factory) registry |
//! | [`router`] | The [`Router`](router::Router) and its call parameters |
//! | [`exchange`] | The atomic [`Exchange`](exchange::Exchange) host |
//! | [`token`] | [`InMemoryTokenBank`](token::InMemoryTokenBank) |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig), loadable from TOML |
//! | [`context`] | [`CallContext`](context::CallContext) threaded through every call |
//! | [`math`] | Checked arithmetic and integer square root |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod context;
pub mod curves;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod factory;
pub mod math;
pub mod pair;
pub mod prelude;
pub mod router;
pub mod token;
pub mod traits;
