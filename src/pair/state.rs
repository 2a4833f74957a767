//! The pair state machine.
//!
//! A [`Pair`] owns one token pair's reserves, its liquidity-share ledger,
//! protocol-fee accounting and price history.  It never trusts cached
//! numbers for inbound value: deposits and swap inputs are derived from
//! the difference between the bank's balances and the last synced
//! reserves.
//!
//! # Lifecycle
//!
//! ```text
//! uninitialised (reserves 0, supply 0) --mint--> active (supply > 0)
//! ```
//!
//! # Operation order
//!
//! - `mint` / `burn`: protocol fee accrual, share math, transfers, sync,
//!   `k_last` refresh.
//! - `swap`: optimistic transfer, optional callback, input derivation,
//!   invariant check, sync.

use alloy_primitives::U256;
use tracing::{debug, info};

use super::observations::ObservationBuffer;
use super::shares::LiquidityShares;
use super::{BURN_ADDRESS, MINIMUM_LIQUIDITY};
use crate::context::CallContext;
use crate::curves::CurveKind;
use crate::domain::{Address, Amount, CurveId, Decimals, Event, Observation, PairKey, Rounding, Token};
use crate::error::AmmError;
use crate::math::{isqrt, mul_div, CheckedArithmetic};
use crate::traits::{InvariantCheck, PricingCurve, SwapCallee, TokenBank};

/// Number of fractional bits of the fixed-point prices in observations.
const Q112_BITS: usize = 112;

/// Pooled reserves of two tokens bound to one pricing curve.
///
/// Created by the [`Factory`](crate::factory::Factory); lives for as long
/// as the factory that registered it.
#[derive(Debug, Clone)]
pub struct Pair {
    address: Address,
    factory: Address,
    base: Token,
    quote: Token,
    curve: CurveKind,
    reserve_base: Amount,
    reserve_quote: Amount,
    block_timestamp_last: u64,
    price_base_cumulative_last: U256,
    price_quote_cumulative_last: U256,
    k_last: U256,
    shares: LiquidityShares,
    observations: ObservationBuffer,
}

impl Pair {
    /// Creates an empty pair for `key` at its deterministic address.
    #[must_use]
    pub fn new(
        factory: Address,
        key: PairKey,
        base_decimals: Decimals,
        quote_decimals: Decimals,
        curve: CurveKind,
        observation_capacity: usize,
    ) -> Self {
        let address = key.pair_address();
        Self {
            address,
            factory,
            base: Token::new(key.base(), base_decimals),
            quote: Token::new(key.quote(), quote_decimals),
            curve,
            reserve_base: Amount::ZERO,
            reserve_quote: Amount::ZERO,
            block_timestamp_last: 0,
            price_base_cumulative_last: U256::ZERO,
            price_quote_cumulative_last: U256::ZERO,
            k_last: U256::ZERO,
            shares: LiquidityShares::new(address),
            observations: ObservationBuffer::new(observation_capacity),
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Address of the pair (and of its share token).
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Address of the factory that created the pair.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// The smaller-address token.
    #[must_use]
    pub const fn base_token(&self) -> Token {
        self.base
    }

    /// The larger-address token.
    #[must_use]
    pub const fn quote_token(&self) -> Token {
        self.quote
    }

    /// Pricing curve of the pair.
    #[must_use]
    pub const fn curve(&self) -> &CurveKind {
        &self.curve
    }

    /// Id of the pricing curve.
    #[must_use]
    pub fn curve_id(&self) -> CurveId {
        self.curve.id()
    }

    /// `(reserve_base, reserve_quote, block_timestamp_last)`.
    #[must_use]
    pub const fn get_reserves(&self) -> (Amount, Amount, u64) {
        (self.reserve_base, self.reserve_quote, self.block_timestamp_last)
    }

    /// Invariant recorded after the last liquidity event while the
    /// protocol fee was on; zero otherwise.
    #[must_use]
    pub const fn k_last(&self) -> U256 {
        self.k_last
    }

    /// Running Q112 sums `(quote/base · seconds, base/quote · seconds)`.
    #[must_use]
    pub const fn price_cumulative_last(&self) -> (U256, U256) {
        (self.price_base_cumulative_last, self.price_quote_cumulative_last)
    }

    /// The most recent `n` observations in chronological order, or all of
    /// them when `n` is zero or exceeds the history length.
    #[must_use]
    pub fn get_observations(&self, n: usize) -> Vec<Observation> {
        self.observations.recent(n)
    }

    /// Time-weighted average prices over the last `points` observations,
    /// as Q112 fixed-point `(quote per base, base per quote)`.
    ///
    /// `points` of zero uses the whole history.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientObservations`] unless the selected
    /// window spans at least two observations at different timestamps.
    pub fn twap(&self, points: usize) -> Result<(U256, U256), AmmError> {
        let window = self.observations.recent(points);
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return Err(AmmError::InsufficientObservations);
        };
        let elapsed = last.timestamp.saturating_sub(first.timestamp);
        if elapsed == 0 {
            return Err(AmmError::InsufficientObservations);
        }
        let elapsed = U256::from(elapsed);
        let base = last
            .cumulative_base_price
            .wrapping_sub(first.cumulative_base_price)
            / elapsed;
        let quote = last
            .cumulative_quote_price
            .wrapping_sub(first.cumulative_quote_price)
            / elapsed;
        Ok((base, quote))
    }

    /// Returns `true` if `token` is one of the pair's two tokens.
    #[must_use]
    pub fn contains(&self, token: Address) -> bool {
        token == self.base.address() || token == self.quote.address()
    }

    /// `(reserve_in, reserve_out, decimals_in, decimals_out)` when selling
    /// `token_in`.
    fn oriented(&self, token_in: Address) -> Result<(Amount, Amount, Decimals, Decimals), AmmError> {
        if token_in == self.base.address() {
            Ok((
                self.reserve_base,
                self.reserve_quote,
                self.base.decimals(),
                self.quote.decimals(),
            ))
        } else if token_in == self.quote.address() {
            Ok((
                self.reserve_quote,
                self.reserve_base,
                self.quote.decimals(),
                self.base.decimals(),
            ))
        } else {
            Err(AmmError::InvalidPath)
        }
    }

    /// Reserves ordered as `(reserve of token, reserve of the other)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if `token` is not in the pair.
    pub fn reserves_for(&self, token: Address) -> Result<(Amount, Amount), AmmError> {
        let (a, b, _, _) = self.oriented(token)?;
        Ok((a, b))
    }

    /// Output of selling `amount_in` of `token_in` at current reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if `token_in` is not in the pair.
    /// - Curve pricing errors.
    pub fn amount_out(&self, token_in: Address, amount_in: Amount) -> Result<Amount, AmmError> {
        let (r_in, r_out, d_in, d_out) = self.oriented(token_in)?;
        self.curve.amount_out(amount_in, r_in, r_out, d_in, d_out)
    }

    /// Input of `token_in` required to receive `amount_out` of the other
    /// token at current reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if `token_in` is not in the pair.
    /// - Curve pricing errors.
    pub fn amount_in(&self, token_in: Address, amount_out: Amount) -> Result<Amount, AmmError> {
        let (r_in, r_out, d_in, d_out) = self.oriented(token_in)?;
        self.curve.amount_in(amount_out, r_in, r_out, d_in, d_out)
    }

    // -----------------------------------------------------------------------
    // Liquidity-share token
    // -----------------------------------------------------------------------

    /// Total outstanding liquidity shares.
    pub const fn total_supply(&self) -> Amount {
        self.shares.total_supply()
    }

    /// Shares held by `account`.
    pub fn balance_of(&self, account: Address) -> Amount {
        self.shares.balance_of(account)
    }

    /// Shares `spender` may move on behalf of `owner`.
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.shares.allowance(owner, spender)
    }

    /// Moves the caller's shares to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if the caller holds less.
    pub fn transfer<B>(&mut self, ctx: &mut CallContext<'_, B>, to: Address, amount: Amount) -> Result<(), AmmError> {
        let from = ctx.caller();
        self.shares.transfer(from, to, amount, ctx.events_mut())
    }

    /// Lets `spender` move up to `amount` of the caller's shares.
    pub fn approve<B>(&mut self, ctx: &mut CallContext<'_, B>, spender: Address, amount: Amount) {
        let owner = ctx.caller();
        self.shares.approve(owner, spender, amount, ctx.events_mut());
    }

    /// Moves `from`'s shares to `to` using the caller's allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too low.
    /// - [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer_from<B>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let spender = ctx.caller();
        self.shares.transfer_from(spender, from, to, amount, ctx.events_mut())
    }

    // -----------------------------------------------------------------------
    // Internal steps
    // -----------------------------------------------------------------------

    fn balances<B: TokenBank>(&self, bank: &B) -> Result<(Amount, Amount), AmmError> {
        Ok((
            bank.balance_of(self.base.address(), self.address)?,
            bank.balance_of(self.quote.address(), self.address)?,
        ))
    }

    fn current_k(&self) -> Result<U256, AmmError> {
        self.curve.k(
            self.reserve_base,
            self.reserve_quote,
            self.base.decimals(),
            self.quote.decimals(),
        )
    }

    /// Sets reserves to `balances`, accumulates prices over the elapsed
    /// time, records an observation when time advanced, and emits `Sync`.
    fn update<B>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        balance_base: Amount,
        balance_quote: Amount,
    ) -> Result<(), AmmError> {
        let now = ctx.timestamp();
        let elapsed = now.saturating_sub(self.block_timestamp_last);
        if elapsed > 0 && !self.reserve_base.is_zero() && !self.reserve_quote.is_zero() {
            let q112 = U256::from(1u8) << Q112_BITS;
            let price_base = mul_div(self.reserve_quote.get(), q112, self.reserve_base.get(), Rounding::Down)?;
            let price_quote = mul_div(self.reserve_base.get(), q112, self.reserve_quote.get(), Rounding::Down)?;
            let elapsed = U256::from(elapsed);
            self.price_base_cumulative_last = self
                .price_base_cumulative_last
                .wrapping_add(price_base.wrapping_mul(elapsed));
            self.price_quote_cumulative_last = self
                .price_quote_cumulative_last
                .wrapping_add(price_quote.wrapping_mul(elapsed));
        }

        self.reserve_base = balance_base;
        self.reserve_quote = balance_quote;
        // a clock set backwards never rewinds the accumulator
        self.block_timestamp_last = self.block_timestamp_last.max(now);

        if self.observations.latest().map_or(true, |o| now > o.timestamp) {
            self.observations.record(Observation::new(
                now,
                self.price_base_cumulative_last,
                self.price_quote_cumulative_last,
            ));
        }

        ctx.emit(Event::Sync {
            pair: self.address,
            reserve_base: balance_base,
            reserve_quote: balance_quote,
        });
        Ok(())
    }

    /// Shares owed to `fee_to` for the invariant growth since the last
    /// liquidity event.  Zero when the fee is off or nothing accrued.
    fn pending_fee(&self, fee_to: Option<Address>) -> Result<Amount, AmmError> {
        if fee_to.is_none() || self.k_last.is_zero() {
            return Ok(Amount::ZERO);
        }

        let root_k = isqrt(self.current_k()?);
        let root_k_last = isqrt(self.k_last);
        if root_k <= root_k_last {
            return Ok(Amount::ZERO);
        }
        let total = self.shares.total_supply().get();
        let numerator = total
            .checked_mul(root_k - root_k_last)
            .ok_or(AmmError::Overflow("protocol fee numerator overflow"))?;
        let denominator = root_k
            .checked_mul(U256::from(5u8))
            .and_then(|v| v.checked_add(root_k_last))
            .ok_or(AmmError::Overflow("protocol fee denominator overflow"))?;
        Ok(Amount::new(numerator / denominator))
    }

    /// Mints a fee computed by [`Pair::pending_fee`], or forgets `k_last`
    /// when the fee is off.
    fn settle_fee(&mut self, fee_to: Option<Address>, fee: Amount, events: &mut Vec<Event>) -> Result<(), AmmError> {
        let Some(fee_to) = fee_to else {
            self.k_last = U256::ZERO;
            return Ok(());
        };
        if !fee.is_zero() {
            self.shares.mint(fee_to, fee, events)?;
            info!(pair = %self.address, %fee_to, liquidity = %fee, "protocol fee minted");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Liquidity
    // -----------------------------------------------------------------------

    /// Issues shares for the tokens deposited since the last sync.
    ///
    /// The first mint locks [`MINIMUM_LIQUIDITY`] shares at
    /// [`BURN_ADDRESS`] and credits `to` with `sqrt(a · b) − 1000`.
    /// Later mints credit the smaller of the two proportional shares.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityMinted`] if no shares would be
    ///   issued.
    /// - [`AmmError::Underflow`] if a balance is below its reserve.
    pub fn mint<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        fee_to: Option<Address>,
        to: Address,
    ) -> Result<Amount, AmmError> {
        let (balance_base, balance_quote) = self.balances(ctx.bank())?;
        let amount_base = balance_base.safe_sub(&self.reserve_base)?;
        let amount_quote = balance_quote.safe_sub(&self.reserve_quote)?;

        // nothing is written until the share count is known to be valid
        let fee = self.pending_fee(fee_to)?;
        let total = self.shares.total_supply().safe_add(&fee)?;
        let minimum = Amount::from(MINIMUM_LIQUIDITY);
        let first = total.is_zero();

        let liquidity = if first {
            let root = Amount::new(isqrt(amount_base.safe_mul(&amount_quote)?.get()));
            root.checked_sub(&minimum)
                .ok_or(AmmError::InsufficientLiquidityMinted)?
        } else {
            let by_base = amount_base
                .safe_mul(&total)?
                .safe_div(&self.reserve_base, Rounding::Down)?;
            let by_quote = amount_quote
                .safe_mul(&total)?
                .safe_div(&self.reserve_quote, Rounding::Down)?;
            by_base.min(by_quote)
        };
        if liquidity.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }

        self.settle_fee(fee_to, fee, ctx.events_mut())?;
        if first {
            self.shares.mint(BURN_ADDRESS, minimum, ctx.events_mut())?;
        }
        self.shares.mint(to, liquidity, ctx.events_mut())?;
        self.update(ctx, balance_base, balance_quote)?;
        if fee_to.is_some() {
            self.k_last = self.current_k()?;
        }

        ctx.emit(Event::Mint {
            pair: self.address,
            sender: ctx.caller(),
            amount_base,
            amount_quote,
        });
        debug!(pair = %self.address, %to, %liquidity, %amount_base, %amount_quote, "liquidity minted");
        Ok(liquidity)
    }

    /// Redeems the shares held by the pair itself for a proportional
    /// slice of both balances, sent to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientLiquidityBurned`] if either
    /// redeemed amount would be zero.
    pub fn burn<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        fee_to: Option<Address>,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let (balance_base, balance_quote) = self.balances(ctx.bank())?;
        let liquidity = self.shares.balance_of(self.address);

        let fee = self.pending_fee(fee_to)?;
        let total = self.shares.total_supply().safe_add(&fee)?;
        if total.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        let amount_base = liquidity
            .safe_mul(&balance_base)?
            .safe_div(&total, Rounding::Down)?;
        let amount_quote = liquidity
            .safe_mul(&balance_quote)?
            .safe_div(&total, Rounding::Down)?;
        if amount_base.is_zero() || amount_quote.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        self.settle_fee(fee_to, fee, ctx.events_mut())?;
        self.shares.burn(self.address, liquidity, ctx.events_mut())?;
        let pair = self.address;
        ctx.bank_mut()
            .transfer(self.base.address(), pair, to, amount_base)?;
        ctx.bank_mut()
            .transfer(self.quote.address(), pair, to, amount_quote)?;

        let (balance_base, balance_quote) = self.balances(ctx.bank())?;
        self.update(ctx, balance_base, balance_quote)?;
        if fee_to.is_some() {
            self.k_last = self.current_k()?;
        }

        ctx.emit(Event::Burn {
            pair,
            sender: ctx.caller(),
            amount_base,
            amount_quote,
            to,
        });
        debug!(%pair, %to, %liquidity, %amount_base, %amount_quote, "liquidity burned");
        Ok((amount_base, amount_quote))
    }

    // -----------------------------------------------------------------------
    // Swap
    // -----------------------------------------------------------------------

    /// Sends the requested outputs to `to`, derives the inputs from the
    /// resulting balances and verifies the curve invariant.
    ///
    /// The caller must have transferred the input to the pair beforehand.
    /// `data` is ignored without a callee; see [`Pair::swap_with_callee`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`AmmError::InsufficientLiquidity`] if an output reaches its reserve.
    /// - [`AmmError::InvalidTo`] if `to` is one of the pair's tokens.
    /// - [`AmmError::InsufficientInputAmount`] if nothing was paid in.
    /// - [`AmmError::K`] if the fee-adjusted invariant decreased.
    pub fn swap<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        to: Address,
        data: &[u8],
    ) -> Result<(), AmmError> {
        self.swap_inner(ctx, amount_base_out, amount_quote_out, to, data, None)
    }

    /// [`Pair::swap`] with a flash callback: when `data` is non-empty,
    /// `callee` runs after the optimistic transfer and before the
    /// invariant check.
    ///
    /// # Errors
    ///
    /// Those of [`Pair::swap`], plus any error returned by `callee`.
    pub fn swap_with_callee<B: TokenBank, C: SwapCallee<B>>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        to: Address,
        data: &[u8],
        callee: &mut C,
    ) -> Result<(), AmmError> {
        self.swap_inner(
            ctx,
            amount_base_out,
            amount_quote_out,
            to,
            data,
            Some(callee as &mut dyn SwapCallee<B>),
        )
    }

    fn swap_inner<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        to: Address,
        data: &[u8],
        callee: Option<&mut dyn SwapCallee<B>>,
    ) -> Result<(), AmmError> {
        if amount_base_out.is_zero() && amount_quote_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        let (reserve_base, reserve_quote) = (self.reserve_base, self.reserve_quote);
        if amount_base_out >= reserve_base || amount_quote_out >= reserve_quote {
            return Err(AmmError::InsufficientLiquidity);
        }
        if self.contains(to) {
            return Err(AmmError::InvalidTo);
        }

        let pair = self.address;
        if !amount_base_out.is_zero() {
            ctx.bank_mut()
                .transfer(self.base.address(), pair, to, amount_base_out)?;
        }
        if !amount_quote_out.is_zero() {
            ctx.bank_mut()
                .transfer(self.quote.address(), pair, to, amount_quote_out)?;
        }
        if let Some(callee) = callee {
            if !data.is_empty() {
                let sender = ctx.caller();
                callee.on_swap(ctx.bank_mut(), pair, sender, amount_base_out, amount_quote_out, data)?;
            }
        }

        let (balance_base, balance_quote) = self.balances(ctx.bank())?;
        let kept_base = reserve_base.safe_sub(&amount_base_out)?;
        let kept_quote = reserve_quote.safe_sub(&amount_quote_out)?;
        let amount_base_in = balance_base.saturating_sub(&kept_base);
        let amount_quote_in = balance_quote.saturating_sub(&kept_quote);
        if amount_base_in.is_zero() && amount_quote_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }

        self.curve.check_invariant(&InvariantCheck {
            reserve_base,
            reserve_quote,
            balance_base,
            balance_quote,
            amount_base_in,
            amount_quote_in,
            decimals_base: self.base.decimals(),
            decimals_quote: self.quote.decimals(),
        })?;

        self.update(ctx, balance_base, balance_quote)?;
        ctx.emit(Event::Swap {
            pair,
            sender: ctx.caller(),
            base_in: amount_base_in,
            quote_in: amount_quote_in,
            base_out: amount_base_out,
            quote_out: amount_quote_out,
            to,
        });
        debug!(
            %pair,
            %to,
            %amount_base_in,
            %amount_quote_in,
            %amount_base_out,
            %amount_quote_out,
            "swap settled"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reserve maintenance
    // -----------------------------------------------------------------------

    /// Sends any balance above the reserves to `to`.
    ///
    /// # Errors
    ///
    /// Token collaborator errors.
    pub fn skim<B: TokenBank>(&mut self, ctx: &mut CallContext<'_, B>, to: Address) -> Result<(), AmmError> {
        let (balance_base, balance_quote) = self.balances(ctx.bank())?;
        let excess_base = balance_base.saturating_sub(&self.reserve_base);
        let excess_quote = balance_quote.saturating_sub(&self.reserve_quote);
        let pair = self.address;
        if !excess_base.is_zero() {
            ctx.bank_mut()
                .transfer(self.base.address(), pair, to, excess_base)?;
        }
        if !excess_quote.is_zero() {
            ctx.bank_mut()
                .transfer(self.quote.address(), pair, to, excess_quote)?;
        }
        Ok(())
    }

    /// Forces the reserves to match the current balances.
    ///
    /// # Errors
    ///
    /// Token collaborator errors.
    pub fn sync<B: TokenBank>(&mut self, ctx: &mut CallContext<'_, B>) -> Result<(), AmmError> {
        let (balance_base, balance_quote) = self.balances(ctx.bank())?;
        self.update(ctx, balance_base, balance_quote)
    }
}
