//! Quote helpers and multi-step liquidity and swap orchestration.

use tracing::debug;

use super::params::{AddLiquidity, RemoveLiquidity, SwapExactIn, SwapExactOut};
use crate::context::CallContext;
use crate::curves::quote;
use crate::domain::{check_chain, Address, Amount, CurveId, Decimals, Route};
use crate::error::AmmError;
use crate::factory::Factory;
use crate::traits::{PricingCurve, TokenBank};

/// Stateless orchestration layer over a [`Factory`].
///
/// The router pulls tokens with [`TokenBank::transfer_from`], acting as
/// the spender, so callers approve the router's address first.  Pair
/// calls it makes carry the router as sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    address: Address,
}

impl Router {
    /// Creates a router acting from `address`.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    /// Address the router spends and calls from.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    // -----------------------------------------------------------------------
    // Pure helpers
    // -----------------------------------------------------------------------

    /// See [`quote`].
    ///
    /// # Errors
    ///
    /// Those of [`quote`].
    pub fn quote(&self, amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
        quote(amount_a, reserve_a, reserve_b)
    }

    /// Single-hop output on the whitelisted curve `curve`.
    ///
    /// # Errors
    ///
    /// [`AmmError::CurveNotAllowed`], or the curve's pricing errors.
    #[allow(clippy::too_many_arguments)]
    pub fn get_amount_out(
        &self,
        factory: &Factory,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
        curve: CurveId,
    ) -> Result<Amount, AmmError> {
        factory
            .curve(curve)
            .ok_or(AmmError::CurveNotAllowed)?
            .amount_out(amount_in, reserve_in, reserve_out, decimals_in, decimals_out)
    }

    /// Single-hop input on the whitelisted curve `curve`.
    ///
    /// # Errors
    ///
    /// [`AmmError::CurveNotAllowed`], or the curve's pricing errors.
    #[allow(clippy::too_many_arguments)]
    pub fn get_amount_in(
        &self,
        factory: &Factory,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals_in: Decimals,
        decimals_out: Decimals,
        curve: CurveId,
    ) -> Result<Amount, AmmError> {
        factory
            .curve(curve)
            .ok_or(AmmError::CurveNotAllowed)?
            .amount_in(amount_out, reserve_in, reserve_out, decimals_in, decimals_out)
    }

    /// Amounts along `routes` starting from `amount_in`: element `0` is
    /// the input, element `i + 1` the output of hop `i`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if the routes do not chain or a hop has
    ///   no registered pair.
    /// - Pricing errors of the hop's curve.
    pub fn get_amounts_out(&self, factory: &Factory, amount_in: Amount, routes: &[Route]) -> Result<Vec<Amount>, AmmError> {
        check_chain(routes)?;
        let mut amounts = Vec::with_capacity(routes.len() + 1);
        amounts.push(amount_in);
        let mut current = amount_in;
        for hop in routes {
            let pair = hop_pair(factory, hop)?;
            current = factory
                .pair(pair)
                .ok_or(AmmError::InvalidPath)?
                .amount_out(hop.from, current)?;
            amounts.push(current);
        }
        Ok(amounts)
    }

    /// Amounts along `routes` ending in `amount_out`, computed backwards:
    /// element `0` is the required input.
    ///
    /// # Errors
    ///
    /// Same as [`Router::get_amounts_out`].
    pub fn get_amounts_in(&self, factory: &Factory, amount_out: Amount, routes: &[Route]) -> Result<Vec<Amount>, AmmError> {
        check_chain(routes)?;
        let mut amounts = vec![Amount::ZERO; routes.len() + 1];
        let mut current = amount_out;
        amounts[routes.len()] = current;
        for (i, hop) in routes.iter().enumerate().rev() {
            let pair = hop_pair(factory, hop)?;
            current = factory
                .pair(pair)
                .ok_or(AmmError::InvalidPath)?
                .amount_in(hop.from, current)?;
            amounts[i] = current;
        }
        Ok(amounts)
    }

    // -----------------------------------------------------------------------
    // Liquidity
    // -----------------------------------------------------------------------

    /// Deposits the optimal amounts into the pair and mints shares to
    /// `params.to`.  Returns `(amount_a, amount_b, liquidity)`.
    ///
    /// An empty pool takes the desired amounts as given; otherwise the
    /// deposit follows the pool's current ratio.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if the ratio pushes a deposit below its minimum.
    /// - Pair creation, token and mint errors.
    pub fn add_liquidity<B: TokenBank>(
        &self,
        factory: &mut Factory,
        ctx: &mut CallContext<'_, B>,
        params: &AddLiquidity,
    ) -> Result<(Amount, Amount, Amount), AmmError> {
        ensure_deadline(params.deadline, ctx.timestamp())?;
        let pair = match factory.get_pair(params.token_a, params.token_b, params.curve) {
            Some(pair) => pair,
            None => factory.create_pair(ctx, params.token_a, params.token_b, params.curve)?,
        };
        let (reserve_a, reserve_b) = factory
            .pair(pair)
            .ok_or(AmmError::PairNotFound)?
            .reserves_for(params.token_a)?;
        let (amount_a, amount_b) = optimal_amounts(params, reserve_a, reserve_b)?;

        let caller = ctx.caller();
        ctx.bank_mut()
            .transfer_from(params.token_a, self.address, caller, pair, amount_a)?;
        ctx.bank_mut()
            .transfer_from(params.token_b, self.address, caller, pair, amount_b)?;
        let liquidity = factory.mint(&mut ctx.as_caller(self.address), pair, params.to)?;

        debug!(%pair, %caller, %amount_a, %amount_b, %liquidity, "router added liquidity");
        Ok((amount_a, amount_b, liquidity))
    }

    /// Redeems the caller's shares and returns `(amount_a, amount_b)` in
    /// the caller's token order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::PairNotFound`] if the pair does not exist.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if a redeemed amount is below its minimum.
    /// - Share allowance and burn errors.
    pub fn remove_liquidity<B: TokenBank>(
        &self,
        factory: &mut Factory,
        ctx: &mut CallContext<'_, B>,
        params: &RemoveLiquidity,
    ) -> Result<(Amount, Amount), AmmError> {
        ensure_deadline(params.deadline, ctx.timestamp())?;
        let pair = factory
            .get_pair(params.token_a, params.token_b, params.curve)
            .ok_or(AmmError::PairNotFound)?;
        let caller = ctx.caller();

        let state = factory.pair_mut(pair).ok_or(AmmError::PairNotFound)?;
        let a_is_base = state.base_token().address() == params.token_a;
        state.transfer_from(&mut ctx.as_caller(self.address), caller, pair, params.liquidity)?;
        let (amount_base, amount_quote) = factory.burn(&mut ctx.as_caller(self.address), pair, params.to)?;

        let (amount_a, amount_b) = if a_is_base {
            (amount_base, amount_quote)
        } else {
            (amount_quote, amount_base)
        };
        if amount_a < params.amount_a_min {
            return Err(AmmError::InsufficientAAmount);
        }
        if amount_b < params.amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }

        debug!(%pair, %caller, liquidity = %params.liquidity, %amount_a, %amount_b, "router removed liquidity");
        Ok((amount_a, amount_b))
    }

    // -----------------------------------------------------------------------
    // Swaps
    // -----------------------------------------------------------------------

    /// Sells exactly `params.amount_in` along the routes.  Returns every
    /// hop amount.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::InsufficientOutputAmount`] if the final output is
    ///   below `amount_out_min`.
    /// - Path, token and swap errors.
    pub fn swap_exact_tokens_for_tokens<B: TokenBank>(
        &self,
        factory: &mut Factory,
        ctx: &mut CallContext<'_, B>,
        params: &SwapExactIn,
    ) -> Result<Vec<Amount>, AmmError> {
        ensure_deadline(params.deadline, ctx.timestamp())?;
        let amounts = self.get_amounts_out(factory, params.amount_in, &params.routes)?;
        let Some(&last) = amounts.last() else {
            return Err(AmmError::InvalidPath);
        };
        if last < params.amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }
        self.pay_first_hop(factory, ctx, &params.routes, amounts[0])?;
        self.execute_hops(factory, ctx, &amounts, &params.routes, params.to)?;
        Ok(amounts)
    }

    /// Buys exactly `params.amount_out` along the routes.  Returns every
    /// hop amount.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::ExcessiveInputAmount`] if the required input exceeds
    ///   `amount_in_max`.
    /// - Path, token and swap errors.
    pub fn swap_tokens_for_exact_tokens<B: TokenBank>(
        &self,
        factory: &mut Factory,
        ctx: &mut CallContext<'_, B>,
        params: &SwapExactOut,
    ) -> Result<Vec<Amount>, AmmError> {
        ensure_deadline(params.deadline, ctx.timestamp())?;
        let amounts = self.get_amounts_in(factory, params.amount_out, &params.routes)?;
        if amounts[0] > params.amount_in_max {
            return Err(AmmError::ExcessiveInputAmount);
        }
        self.pay_first_hop(factory, ctx, &params.routes, amounts[0])?;
        self.execute_hops(factory, ctx, &amounts, &params.routes, params.to)?;
        Ok(amounts)
    }

    fn pay_first_hop<B: TokenBank>(
        &self,
        factory: &Factory,
        ctx: &mut CallContext<'_, B>,
        routes: &[Route],
        amount: Amount,
    ) -> Result<(), AmmError> {
        let first = routes.first().ok_or(AmmError::InvalidPath)?;
        let pair = hop_pair(factory, first)?;
        let caller = ctx.caller();
        ctx.bank_mut()
            .transfer_from(first.from, self.address, caller, pair, amount)
    }

    /// Swaps hop by hop; each hop's output goes to the next hop's pair and
    /// the last one to `to`.
    fn execute_hops<B: TokenBank>(
        &self,
        factory: &mut Factory,
        ctx: &mut CallContext<'_, B>,
        amounts: &[Amount],
        routes: &[Route],
        to: Address,
    ) -> Result<(), AmmError> {
        for (i, hop) in routes.iter().enumerate() {
            let pair = hop_pair(factory, hop)?;
            let amount_out = amounts.get(i + 1).copied().ok_or(AmmError::InvalidPath)?;
            let base = factory
                .pair(pair)
                .ok_or(AmmError::InvalidPath)?
                .base_token()
                .address();
            let (base_out, quote_out) = if hop.from == base {
                (Amount::ZERO, amount_out)
            } else {
                (amount_out, Amount::ZERO)
            };
            let recipient = match routes.get(i + 1) {
                Some(next) => hop_pair(factory, next)?,
                None => to,
            };
            factory.swap(&mut ctx.as_caller(self.address), pair, base_out, quote_out, recipient, &[])?;
        }
        Ok(())
    }
}

fn ensure_deadline(deadline: u64, now: u64) -> Result<(), AmmError> {
    if deadline < now {
        Err(AmmError::Expired)
    } else {
        Ok(())
    }
}

fn hop_pair(factory: &Factory, hop: &Route) -> Result<Address, AmmError> {
    factory
        .get_pair(hop.from, hop.to, hop.curve)
        .ok_or(AmmError::InvalidPath)
}

fn optimal_amounts(
    params: &AddLiquidity,
    reserve_a: Amount,
    reserve_b: Amount,
) -> Result<(Amount, Amount), AmmError> {
    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok((params.amount_a_desired, params.amount_b_desired));
    }
    let amount_b_optimal = quote(params.amount_a_desired, reserve_a, reserve_b)?;
    if amount_b_optimal <= params.amount_b_desired {
        if amount_b_optimal < params.amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }
        return Ok((params.amount_a_desired, amount_b_optimal));
    }
    let amount_a_optimal = quote(params.amount_b_desired, reserve_b, reserve_a)?;
    if amount_a_optimal > params.amount_a_desired || amount_a_optimal < params.amount_a_min {
        return Err(AmmError::InsufficientAAmount);
    }
    Ok((amount_a_optimal, params.amount_b_desired))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::curves::{CurveKind, VolatileCurve};
    use crate::domain::Event;
    use crate::token::InMemoryTokenBank;

    const WALLET: Address = Address::from_low_u64(1);
    const OTHER: Address = Address::from_low_u64(2);
    const FACTORY: Address = Address::from_low_u64(0xf);
    const ROUTER: Address = Address::from_low_u64(0x7);
    const TOKEN_A: Address = Address::from_low_u64(0xa);
    const TOKEN_B: Address = Address::from_low_u64(0xb);
    const TOKEN_C: Address = Address::from_low_u64(0xc);
    const NOW: u64 = 100;

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    struct Fixture {
        bank: InMemoryTokenBank,
        factory: Factory,
        router: Router,
        curve: CurveId,
        events: Vec<Event>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut bank = InMemoryTokenBank::new();
            for token in [TOKEN_A, TOKEN_B, TOKEN_C] {
                let Ok(()) = bank.deploy(token, Decimals::MAX, amt(1_000_000), WALLET) else {
                    panic!("deploy failed");
                };
                let Ok(()) = bank.approve(token, WALLET, ROUTER, Amount::MAX) else {
                    panic!("approve failed");
                };
            }
            let mut factory = Factory::new(FACTORY, WALLET, 8);
            let Ok(curve) = factory.add_curve(WALLET, CurveKind::from(VolatileCurve::new())) else {
                panic!("curve whitelisted");
            };
            Self {
                bank,
                factory,
                router: Router::new(ROUTER),
                curve,
                events: Vec::new(),
            }
        }

        fn add(&mut self, a: Address, b: Address, amount_a: u64, amount_b: u64) -> Result<(Amount, Amount, Amount), AmmError> {
            let params = AddLiquidity {
                token_a: a,
                token_b: b,
                curve: self.curve,
                amount_a_desired: amt(amount_a),
                amount_b_desired: amt(amount_b),
                amount_a_min: Amount::ZERO,
                amount_b_min: Amount::ZERO,
                to: WALLET,
                deadline: NOW,
            };
            self.add_with(&params)
        }

        fn add_with(&mut self, params: &AddLiquidity) -> Result<(Amount, Amount, Amount), AmmError> {
            let mut ctx = CallContext::new(&mut self.bank, WALLET, NOW, &mut self.events);
            self.router.add_liquidity(&mut self.factory, &mut ctx, params)
        }

        fn pair(&self, a: Address, b: Address) -> Address {
            let Some(pair) = self.factory.get_pair(a, b, self.curve) else {
                panic!("pair missing");
            };
            pair
        }

        fn route(&self, from: Address, to: Address) -> Route {
            Route::new(from, to, self.curve)
        }

        fn balance(&self, token: Address, account: Address) -> Amount {
            let Ok(b) = self.bank.balance_of(token, account) else {
                panic!("unknown token");
            };
            b
        }
    }

    // -- pure helpers -----------------------------------------------------------

    #[test]
    fn single_hop_helpers() {
        let f = Fixture::new();
        let r = amt(100);
        let d = Decimals::MAX;
        assert_eq!(f.router.quote(amt(1), amt(100), amt(200)), Ok(amt(2)));
        assert_eq!(f.router.quote(amt(2), amt(200), amt(100)), Ok(amt(1)));
        assert_eq!(f.router.get_amount_out(&f.factory, amt(2), r, r, d, d, f.curve), Ok(amt(1)));
        assert_eq!(f.router.get_amount_in(&f.factory, amt(1), r, r, d, d, f.curve), Ok(amt(2)));
        assert_eq!(
            f.router.get_amount_out(&f.factory, Amount::ZERO, r, r, d, d, f.curve),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(
            f.router.get_amount_in(&f.factory, Amount::ZERO, r, r, d, d, f.curve),
            Err(AmmError::InsufficientOutputAmount)
        );
        assert_eq!(
            f.router.get_amount_out(&f.factory, amt(2), Amount::ZERO, r, d, d, f.curve),
            Err(AmmError::InsufficientLiquidity)
        );
        let unknown = CurveId::from_label("unknown");
        assert_eq!(
            f.router.get_amount_out(&f.factory, amt(2), r, r, d, d, unknown),
            Err(AmmError::CurveNotAllowed)
        );
    }

    #[test]
    fn path_amounts() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 10_000, 10_000) else {
            panic!("add failed");
        };
        let routes = [f.route(TOKEN_A, TOKEN_B)];
        assert_eq!(f.router.get_amounts_out(&f.factory, amt(2), &routes), Ok(vec![amt(2), amt(1)]));
        assert_eq!(f.router.get_amounts_in(&f.factory, amt(1), &routes), Ok(vec![amt(2), amt(1)]));
    }

    #[test]
    fn path_rejections() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 10_000, 10_000) else {
            panic!("add failed");
        };
        for bogus in [Address::ZERO, Address::from_low_u64(1)] {
            let routes = [f.route(TOKEN_A, bogus)];
            assert_eq!(
                f.router.get_amounts_out(&f.factory, amt(2), &routes),
                Err(AmmError::InvalidPath)
            );
            assert_eq!(
                f.router.get_amounts_in(&f.factory, amt(1), &routes),
                Err(AmmError::InvalidPath)
            );
        }
        assert_eq!(f.router.get_amounts_out(&f.factory, amt(2), &[]), Err(AmmError::InvalidPath));
        let broken = [f.route(TOKEN_A, TOKEN_B), f.route(TOKEN_A, TOKEN_B)];
        assert_eq!(
            f.router.get_amounts_out(&f.factory, amt(2), &broken),
            Err(AmmError::InvalidPath)
        );
    }

    // -- liquidity -------------------------------------------------------------

    #[test]
    fn add_liquidity_creates_pair() {
        let mut f = Fixture::new();
        assert_eq!(f.add(TOKEN_A, TOKEN_B, 10_000, 10_000), Ok((amt(10_000), amt(10_000), amt(9_000))));
        let pair = f.pair(TOKEN_A, TOKEN_B);
        assert_eq!(f.factory.all_pairs_length(), 1);
        assert_eq!(f.balance(TOKEN_A, pair), amt(10_000));
        let Some(state) = f.factory.pair(pair) else {
            panic!("pair stored");
        };
        assert_eq!(state.balance_of(WALLET), amt(9_000));
        assert!(matches!(f.events.first(), Some(Event::PairCreated { .. })));
        assert!(f
            .events
            .iter()
            .any(|e| matches!(e, Event::Mint { sender, .. } if *sender == ROUTER)));
    }

    #[test]
    fn add_liquidity_follows_pool_ratio() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 1_000, 4_000) else {
            panic!("add failed");
        };
        // too much B offered: A is taken in full, B is quoted
        assert_eq!(f.add(TOKEN_A, TOKEN_B, 1_000, 8_000), Ok((amt(1_000), amt(4_000), amt(2_000))));
        // too much A offered: B is taken in full, A is quoted
        assert_eq!(f.add(TOKEN_A, TOKEN_B, 5_000, 4_000), Ok((amt(1_000), amt(4_000), amt(2_000))));
        // caller order is respected
        assert_eq!(f.add(TOKEN_B, TOKEN_A, 4_000, 5_000), Ok((amt(4_000), amt(1_000), amt(2_000))));
    }

    #[test]
    fn add_liquidity_minimums_and_deadline() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 1_000, 4_000) else {
            panic!("add failed");
        };
        let base = AddLiquidity {
            token_a: TOKEN_A,
            token_b: TOKEN_B,
            curve: f.curve,
            amount_a_desired: amt(1_000),
            amount_b_desired: amt(8_000),
            amount_a_min: Amount::ZERO,
            amount_b_min: amt(4_001),
            to: WALLET,
            deadline: NOW,
        };
        assert_eq!(f.add_with(&base), Err(AmmError::InsufficientBAmount));

        let a_short = AddLiquidity {
            amount_a_desired: amt(5_000),
            amount_b_desired: amt(4_000),
            amount_a_min: amt(1_001),
            amount_b_min: Amount::ZERO,
            ..base
        };
        assert_eq!(f.add_with(&a_short), Err(AmmError::InsufficientAAmount));

        let late = AddLiquidity {
            deadline: NOW - 1,
            amount_b_min: Amount::ZERO,
            ..base
        };
        assert_eq!(f.add_with(&late), Err(AmmError::Expired));
    }

    #[test]
    fn remove_liquidity_returns_caller_order() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 10_000, 10_000) else {
            panic!("add failed");
        };
        let pair = f.pair(TOKEN_A, TOKEN_B);
        {
            let mut ctx = CallContext::new(&mut f.bank, WALLET, NOW, &mut f.events);
            let Some(state) = f.factory.pair_mut(pair) else {
                panic!("pair stored");
            };
            state.approve(&mut ctx, ROUTER, Amount::MAX);
        }

        let params = RemoveLiquidity {
            token_a: TOKEN_B,
            token_b: TOKEN_A,
            curve: f.curve,
            liquidity: amt(1_000),
            amount_a_min: amt(1_000),
            amount_b_min: amt(1_000),
            to: OTHER,
            deadline: NOW,
        };
        let mut ctx = CallContext::new(&mut f.bank, WALLET, NOW, &mut f.events);
        assert_eq!(
            f.router.remove_liquidity(&mut f.factory, &mut ctx, &params),
            Ok((amt(1_000), amt(1_000)))
        );
        assert_eq!(f.balance(TOKEN_A, OTHER), amt(1_000));
        assert_eq!(f.balance(TOKEN_B, OTHER), amt(1_000));
    }

    #[test]
    fn remove_liquidity_without_allowance_fails() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 10_000, 10_000) else {
            panic!("add failed");
        };
        let params = RemoveLiquidity {
            token_a: TOKEN_A,
            token_b: TOKEN_B,
            curve: f.curve,
            liquidity: amt(1_000),
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            to: WALLET,
            deadline: NOW,
        };
        let mut ctx = CallContext::new(&mut f.bank, WALLET, NOW, &mut f.events);
        assert_eq!(
            f.router.remove_liquidity(&mut f.factory, &mut ctx, &params),
            Err(AmmError::InsufficientAllowance)
        );
        let missing = RemoveLiquidity {
            token_b: TOKEN_C,
            ..params
        };
        assert_eq!(
            f.router.remove_liquidity(&mut f.factory, &mut ctx, &missing),
            Err(AmmError::PairNotFound)
        );
    }

    // -- swaps -----------------------------------------------------------------

    #[test]
    fn swap_exact_in_single_hop() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 10_000, 10_000) else {
            panic!("add failed");
        };
        let params = SwapExactIn {
            amount_in: amt(1_000),
            amount_out_min: amt(907),
            routes: vec![f.route(TOKEN_A, TOKEN_B)],
            to: OTHER,
            deadline: NOW,
        };
        let mut ctx = CallContext::new(&mut f.bank, WALLET, NOW, &mut f.events);
        assert_eq!(
            f.router.swap_exact_tokens_for_tokens(&mut f.factory, &mut ctx, &params),
            Err(AmmError::InsufficientOutputAmount)
        );
        let params = SwapExactIn {
            amount_out_min: amt(906),
            ..params
        };
        assert_eq!(
            f.router.swap_exact_tokens_for_tokens(&mut f.factory, &mut ctx, &params),
            Ok(vec![amt(1_000), amt(906)])
        );
        assert_eq!(f.balance(TOKEN_B, OTHER), amt(906));
    }

    #[test]
    fn swap_exact_out_single_hop() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 10_000, 10_000) else {
            panic!("add failed");
        };
        let params = SwapExactOut {
            amount_out: amt(906),
            amount_in_max: amt(999),
            routes: vec![f.route(TOKEN_B, TOKEN_A)],
            to: OTHER,
            deadline: NOW,
        };
        let mut ctx = CallContext::new(&mut f.bank, WALLET, NOW, &mut f.events);
        assert_eq!(
            f.router.swap_tokens_for_exact_tokens(&mut f.factory, &mut ctx, &params),
            Err(AmmError::ExcessiveInputAmount)
        );
        let params = SwapExactOut {
            amount_in_max: amt(1_000),
            ..params
        };
        assert_eq!(
            f.router.swap_tokens_for_exact_tokens(&mut f.factory, &mut ctx, &params),
            Ok(vec![amt(1_000), amt(906)])
        );
        assert_eq!(f.balance(TOKEN_A, OTHER), amt(906));
    }

    #[test]
    fn multi_hop_routes_through_intermediate_pair() {
        let mut f = Fixture::new();
        let Ok(_) = f.add(TOKEN_A, TOKEN_B, 100_000, 100_000) else {
            panic!("add failed");
        };
        let Ok(_) = f.add(TOKEN_B, TOKEN_C, 100_000, 100_000) else {
            panic!("add failed");
        };
        let routes = vec![f.route(TOKEN_A, TOKEN_B), f.route(TOKEN_B, TOKEN_C)];
        let Ok(expected) = f.router.get_amounts_out(&f.factory, amt(1_000), &routes) else {
            panic!("quote failed");
        };
        assert_eq!(expected.len(), 3);

        let params = SwapExactIn {
            amount_in: amt(1_000),
            amount_out_min: Amount::ZERO,
            routes,
            to: OTHER,
            deadline: NOW,
        };
        let mut ctx = CallContext::new(&mut f.bank, WALLET, NOW, &mut f.events);
        assert_eq!(
            f.router.swap_exact_tokens_for_tokens(&mut f.factory, &mut ctx, &params),
            Ok(expected.clone())
        );
        assert_eq!(f.balance(TOKEN_C, OTHER), expected[2]);
        // the intermediate token never touches the caller or the recipient
        assert_eq!(f.balance(TOKEN_B, OTHER), Amount::ZERO);
        let ab = f.pair(TOKEN_A, TOKEN_B);
        let Some(state) = f.factory.pair(ab) else {
            panic!("pair stored");
        };
        let Ok((reserve_a, _)) = state.reserves_for(TOKEN_A) else {
            panic!("token in pair");
        };
        assert_eq!(reserve_a, amt(101_000));
    }

    #[test]
    fn expired_swap() {
        let mut f = Fixture::new();
        let params = SwapExactIn {
            amount_in: amt(1_000),
            amount_out_min: Amount::ZERO,
            routes: vec![f.route(TOKEN_A, TOKEN_B)],
            to: OTHER,
            deadline: NOW - 1,
        };
        let mut ctx = CallContext::new(&mut f.bank, WALLET, NOW, &mut f.events);
        assert_eq!(
            f.router.swap_exact_tokens_for_tokens(&mut f.factory, &mut ctx, &params),
            Err(AmmError::Expired)
        );
    }
}
