//! Atomic call host.

use tracing::{debug, info, warn};

use crate::config::ExchangeConfig;
use crate::context::CallContext;
use crate::curves::{CurveKind, VolatileCurve};
use crate::domain::{Address, Amount, CurveId, Decimals, Event, Route};
use crate::error::AmmError;
use crate::factory::Factory;
use crate::pair::Pair;
use crate::router::{AddLiquidity, RemoveLiquidity, Router, SwapExactIn, SwapExactOut};
use crate::token::InMemoryTokenBank;
use crate::traits::{SwapCallee, TokenBank};

/// A factory, its router and the token bank, driven one call at a time.
///
/// Every state-changing method runs against a copy of the factory and the
/// bank and commits only when the call succeeds, so a failed call leaves
/// no balance, reserve, share or event behind.  The host also owns the
/// block clock read by every call.
///
/// # Examples
///
/// ```
/// use stark_amm::config::ExchangeConfig;
/// use stark_amm::domain::{Address, Amount, Decimals};
/// use stark_amm::exchange::Exchange;
/// use stark_amm::token::InMemoryTokenBank;
///
/// let admin = Address::from_low_u64(1);
/// let mut exchange = Exchange::new(admin, InMemoryTokenBank::new(), &ExchangeConfig::default())
///     .expect("valid config");
/// assert_eq!(exchange.factory().allowed_curves().count(), 2);
///
/// let token = Address::from_low_u64(0xa);
/// exchange
///     .bank_mut()
///     .deploy(token, Decimals::MAX, Amount::from(1_000u64), admin)
///     .expect("fresh token");
/// assert!(exchange.transfer(admin, token, Address::from_low_u64(2), Amount::from(5_000u64)).is_err());
/// assert_eq!(exchange.balance_of(token, admin), Ok(Amount::from(1_000u64)));
/// ```
#[derive(Debug, Clone)]
pub struct Exchange<B = InMemoryTokenBank> {
    factory: Factory,
    router: Router,
    bank: B,
    timestamp: u64,
    events: Vec<Event>,
}

impl<B: TokenBank + Clone> Exchange<B> {
    /// Builds an exchange governed by `fee_to_setter`.
    ///
    /// When the configuration asks for it, the volatile curve and the
    /// configured stable curve are whitelisted up front.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(fee_to_setter: Address, bank: B, config: &ExchangeConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let mut factory = Factory::new(
            Address::derive(b"stark-amm/factory"),
            fee_to_setter,
            config.observation_capacity(),
        );
        if config.whitelist_default_curves() {
            factory.add_curve(fee_to_setter, CurveKind::from(VolatileCurve::new()))?;
            factory.add_curve(fee_to_setter, CurveKind::from(config.stable().curve()?))?;
        }
        let router = Router::new(Address::derive(b"stark-amm/router"));
        info!(
            factory = %factory.address(),
            router = %router.address(),
            observation_capacity = config.observation_capacity(),
            "exchange initialised"
        );
        Ok(Self {
            factory,
            router,
            bank,
            timestamp: 0,
            events: Vec::new(),
        })
    }

    /// Runs `call` on snapshots of the factory and the bank, committing
    /// them and the emitted events only on success.
    fn atomically<T>(
        &mut self,
        caller: Address,
        operation: &'static str,
        call: impl FnOnce(&mut Factory, &Router, &mut CallContext<'_, B>) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let mut factory = self.factory.clone();
        let mut bank = self.bank.clone();
        let mut events = Vec::new();
        let result = {
            let mut ctx = CallContext::new(&mut bank, caller, self.timestamp, &mut events);
            call(&mut factory, &self.router, &mut ctx)
        };
        match result {
            Ok(value) => {
                self.factory = factory;
                self.bank = bank;
                self.events.append(&mut events);
                Ok(value)
            }
            Err(e) => {
                warn!(operation, %caller, code = e.code(), error = %e, "call reverted");
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Host state
    // -----------------------------------------------------------------------

    /// The pair registry.
    #[must_use]
    pub const fn factory(&self) -> &Factory {
        &self.factory
    }

    /// The router.
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// The token collaborator.
    #[must_use]
    pub const fn bank(&self) -> &B {
        &self.bank
    }

    /// Direct access to the token collaborator, outside any call.
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Current block timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Moves the block clock to `timestamp`.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        debug!(from = self.timestamp, to = timestamp, "clock set");
        self.timestamp = timestamp;
    }

    /// Advances the block clock by `seconds`.
    pub fn advance_time(&mut self, seconds: u64) {
        self.set_timestamp(self.timestamp.saturating_add(seconds));
    }

    /// Events committed so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drains the committed events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Tokens
    // -----------------------------------------------------------------------

    /// Balance of `account` in `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownToken`] for an undeployed token.
    pub fn balance_of(&self, token: Address, account: Address) -> Result<Amount, AmmError> {
        self.bank.balance_of(token, account)
    }

    /// Moves `amount` of `token` from `caller` to `to`.
    ///
    /// # Errors
    ///
    /// Token collaborator errors.
    pub fn transfer(&mut self, caller: Address, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.atomically(caller, "transfer", |_, _, ctx| {
            ctx.bank_mut().transfer(token, caller, to, amount)
        })
    }

    /// Lets `spender` move up to `amount` of the caller's `token`.
    ///
    /// # Errors
    ///
    /// Token collaborator errors.
    pub fn approve(&mut self, caller: Address, token: Address, spender: Address, amount: Amount) -> Result<(), AmmError> {
        self.atomically(caller, "approve", |_, _, ctx| {
            ctx.bank_mut().approve(token, caller, spender, amount)
        })
    }

    // -----------------------------------------------------------------------
    // Governance
    // -----------------------------------------------------------------------

    /// See [`Factory::add_curve`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::add_curve`].
    pub fn add_curve(&mut self, caller: Address, curve: CurveKind) -> Result<CurveId, AmmError> {
        self.atomically(caller, "add_curve", |factory, _, _| factory.add_curve(caller, curve))
    }

    /// See [`Factory::set_fee_to`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::set_fee_to`].
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Address) -> Result<(), AmmError> {
        self.atomically(caller, "set_fee_to", |factory, _, _| factory.set_fee_to(caller, fee_to))
    }

    /// See [`Factory::set_fee_to_setter`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::set_fee_to_setter`].
    pub fn set_fee_to_setter(&mut self, caller: Address, setter: Address) -> Result<(), AmmError> {
        self.atomically(caller, "set_fee_to_setter", |factory, _, _| {
            factory.set_fee_to_setter(caller, setter)
        })
    }

    // -----------------------------------------------------------------------
    // Pairs
    // -----------------------------------------------------------------------

    /// See [`Factory::create_pair`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::create_pair`].
    pub fn create_pair(
        &mut self,
        caller: Address,
        token_a: Address,
        token_b: Address,
        curve: CurveId,
    ) -> Result<Address, AmmError> {
        self.atomically(caller, "create_pair", |factory, _, ctx| {
            factory.create_pair(ctx, token_a, token_b, curve)
        })
    }

    /// See [`Factory::get_pair`].
    #[must_use]
    pub fn get_pair(&self, token_a: Address, token_b: Address, curve: CurveId) -> Option<Address> {
        self.factory.get_pair(token_a, token_b, curve)
    }

    /// The pair registered at `address`.
    #[must_use]
    pub fn pair(&self, address: Address) -> Option<&Pair> {
        self.factory.pair(address)
    }

    fn existing_pair(&self, address: Address) -> Result<&Pair, AmmError> {
        self.factory.pair(address).ok_or(AmmError::PairNotFound)
    }

    /// See [`Pair::mint`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::mint`].
    pub fn mint(&mut self, caller: Address, pair: Address, to: Address) -> Result<Amount, AmmError> {
        self.atomically(caller, "mint", |factory, _, ctx| factory.mint(ctx, pair, to))
    }

    /// See [`Pair::burn`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::burn`].
    pub fn burn(&mut self, caller: Address, pair: Address, to: Address) -> Result<(Amount, Amount), AmmError> {
        self.atomically(caller, "burn", |factory, _, ctx| factory.burn(ctx, pair, to))
    }

    /// See [`Pair::swap`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::swap`].
    pub fn swap(
        &mut self,
        caller: Address,
        pair: Address,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        to: Address,
    ) -> Result<(), AmmError> {
        self.atomically(caller, "swap", |factory, _, ctx| {
            factory.swap(ctx, pair, amount_base_out, amount_quote_out, to, &[])
        })
    }

    /// See [`Pair::swap_with_callee`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::swap_with_callee`].
    #[allow(clippy::too_many_arguments)]
    pub fn flash_swap<C: SwapCallee<B>>(
        &mut self,
        caller: Address,
        pair: Address,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        to: Address,
        data: &[u8],
        callee: &mut C,
    ) -> Result<(), AmmError> {
        self.atomically(caller, "flash_swap", |factory, _, ctx| {
            factory.swap_with_callee(ctx, pair, amount_base_out, amount_quote_out, to, data, callee)
        })
    }

    /// See [`Pair::skim`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::skim`].
    pub fn skim(&mut self, caller: Address, pair: Address, to: Address) -> Result<(), AmmError> {
        self.atomically(caller, "skim", |factory, _, ctx| factory.skim(ctx, pair, to))
    }

    /// See [`Pair::sync`].
    ///
    /// # Errors
    ///
    /// Those of [`Factory::sync`].
    pub fn sync(&mut self, caller: Address, pair: Address) -> Result<(), AmmError> {
        self.atomically(caller, "sync", |factory, _, ctx| factory.sync(ctx, pair))
    }

    // -----------------------------------------------------------------------
    // Liquidity shares
    // -----------------------------------------------------------------------

    /// Moves the caller's shares of `pair` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or those of [`Pair::transfer`].
    pub fn transfer_shares(&mut self, caller: Address, pair: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.atomically(caller, "transfer_shares", |factory, _, ctx| {
            factory
                .pair_mut(pair)
                .ok_or(AmmError::PairNotFound)?
                .transfer(ctx, to, amount)
        })
    }

    /// Lets `spender` move up to `amount` of the caller's shares of `pair`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`].
    pub fn approve_shares(&mut self, caller: Address, pair: Address, spender: Address, amount: Amount) -> Result<(), AmmError> {
        self.atomically(caller, "approve_shares", |factory, _, ctx| {
            factory
                .pair_mut(pair)
                .ok_or(AmmError::PairNotFound)?
                .approve(ctx, spender, amount);
            Ok(())
        })
    }

    /// Moves `from`'s shares of `pair` using the caller's allowance.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or those of [`Pair::transfer_from`].
    pub fn transfer_shares_from(
        &mut self,
        caller: Address,
        pair: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.atomically(caller, "transfer_shares_from", |factory, _, ctx| {
            factory
                .pair_mut(pair)
                .ok_or(AmmError::PairNotFound)?
                .transfer_from(ctx, from, to, amount)
        })
    }

    /// Shares of `pair` held by `account`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`].
    pub fn share_balance(&self, pair: Address, account: Address) -> Result<Amount, AmmError> {
        Ok(self.existing_pair(pair)?.balance_of(account))
    }

    // -----------------------------------------------------------------------
    // Router
    // -----------------------------------------------------------------------

    /// See [`Router::quote`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::quote`].
    pub fn quote(&self, amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
        self.router.quote(amount_a, reserve_a, reserve_b)
    }

    /// See [`Router::get_amount_out`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::get_amount_out`].
    pub fn get_amount_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals: (Decimals, Decimals),
        curve: CurveId,
    ) -> Result<Amount, AmmError> {
        self.router
            .get_amount_out(&self.factory, amount_in, reserve_in, reserve_out, decimals.0, decimals.1, curve)
    }

    /// See [`Router::get_amount_in`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::get_amount_in`].
    pub fn get_amount_in(
        &self,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        decimals: (Decimals, Decimals),
        curve: CurveId,
    ) -> Result<Amount, AmmError> {
        self.router
            .get_amount_in(&self.factory, amount_out, reserve_in, reserve_out, decimals.0, decimals.1, curve)
    }

    /// See [`Router::get_amounts_out`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::get_amounts_out`].
    pub fn get_amounts_out(&self, amount_in: Amount, routes: &[Route]) -> Result<Vec<Amount>, AmmError> {
        self.router.get_amounts_out(&self.factory, amount_in, routes)
    }

    /// See [`Router::get_amounts_in`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::get_amounts_in`].
    pub fn get_amounts_in(&self, amount_out: Amount, routes: &[Route]) -> Result<Vec<Amount>, AmmError> {
        self.router.get_amounts_in(&self.factory, amount_out, routes)
    }

    /// See [`Router::add_liquidity`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::add_liquidity`].
    pub fn add_liquidity(&mut self, caller: Address, params: &AddLiquidity) -> Result<(Amount, Amount, Amount), AmmError> {
        self.atomically(caller, "add_liquidity", |factory, router, ctx| {
            router.add_liquidity(factory, ctx, params)
        })
    }

    /// See [`Router::remove_liquidity`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::remove_liquidity`].
    pub fn remove_liquidity(&mut self, caller: Address, params: &RemoveLiquidity) -> Result<(Amount, Amount), AmmError> {
        self.atomically(caller, "remove_liquidity", |factory, router, ctx| {
            router.remove_liquidity(factory, ctx, params)
        })
    }

    /// See [`Router::swap_exact_tokens_for_tokens`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::swap_exact_tokens_for_tokens`].
    pub fn swap_exact_tokens_for_tokens(&mut self, caller: Address, params: &SwapExactIn) -> Result<Vec<Amount>, AmmError> {
        self.atomically(caller, "swap_exact_tokens_for_tokens", |factory, router, ctx| {
            router.swap_exact_tokens_for_tokens(factory, ctx, params)
        })
    }

    /// See [`Router::swap_tokens_for_exact_tokens`].
    ///
    /// # Errors
    ///
    /// Those of [`Router::swap_tokens_for_exact_tokens`].
    pub fn swap_tokens_for_exact_tokens(&mut self, caller: Address, params: &SwapExactOut) -> Result<Vec<Amount>, AmmError> {
        self.atomically(caller, "swap_tokens_for_exact_tokens", |factory, router, ctx| {
            router.swap_tokens_for_exact_tokens(factory, ctx, params)
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::StableCurveConfig;
    use crate::curves::StableCurve;
    use crate::traits::PricingCurve;

    const ADMIN: Address = Address::from_low_u64(1);
    const USER: Address = Address::from_low_u64(2);
    const TOKEN_A: Address = Address::from_low_u64(0xa);
    const TOKEN_B: Address = Address::from_low_u64(0xb);

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    fn exchange() -> (Exchange, CurveId, Address) {
        let Ok(mut exchange) = Exchange::new(ADMIN, InMemoryTokenBank::new(), &ExchangeConfig::default()) else {
            panic!("default config is valid");
        };
        for token in [TOKEN_A, TOKEN_B] {
            let Ok(()) = exchange.bank_mut().deploy(token, Decimals::MAX, amt(1_000_000), ADMIN) else {
                panic!("deploy failed");
            };
        }
        let curve = VolatileCurve::new().id();
        let Ok(pair) = exchange.create_pair(USER, TOKEN_A, TOKEN_B, curve) else {
            panic!("pair created");
        };
        for token in [TOKEN_A, TOKEN_B] {
            let Ok(()) = exchange.transfer(ADMIN, token, pair, amt(10_000)) else {
                panic!("deposit failed");
            };
        }
        let Ok(_) = exchange.mint(ADMIN, pair, ADMIN) else {
            panic!("mint failed");
        };
        exchange.take_events();
        (exchange, curve, pair)
    }

    #[test]
    fn default_curves_whitelisted() {
        let (exchange, curve, _) = exchange();
        assert!(exchange.factory().is_curve_allowed(curve));
        assert!(exchange.factory().is_curve_allowed(StableCurve::default().id()));
    }

    #[test]
    fn configured_amplification_is_used() {
        let Ok(stable) = StableCurveConfig::new(250) else {
            panic!("valid amplification");
        };
        let Ok(config) = ExchangeConfig::new(16, true, stable) else {
            panic!("valid config");
        };
        let Ok(exchange) = Exchange::new(ADMIN, InMemoryTokenBank::new(), &config) else {
            panic!("valid config");
        };
        let Ok(curve) = StableCurve::new(250) else {
            panic!("valid curve");
        };
        assert!(exchange.factory().is_curve_allowed(curve.id()));
        assert!(!exchange.factory().is_curve_allowed(StableCurve::default().id()));
    }

    #[test]
    fn whitelist_can_be_disabled() {
        let Ok(config) = ExchangeConfig::new(16, false, StableCurveConfig::default()) else {
            panic!("valid config");
        };
        let Ok(exchange) = Exchange::new(ADMIN, InMemoryTokenBank::new(), &config) else {
            panic!("valid config");
        };
        assert_eq!(exchange.factory().allowed_curves().count(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        // deserialised without validation
        let Ok(config) = toml::from_str::<ExchangeConfig>("observation_capacity = 0") else {
            panic!("well-formed toml");
        };
        assert!(matches!(
            Exchange::new(ADMIN, InMemoryTokenBank::new(), &config),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn failed_call_rolls_back_everything() {
        let (mut exchange, _, pair) = exchange();
        let reserves = exchange.pair(pair).map(Pair::get_reserves);

        // pays in, then asks for more than the curve allows
        let greedy = amt(5_000);
        let Ok(()) = exchange.transfer(ADMIN, TOKEN_A, pair, amt(1_000)) else {
            panic!("deposit failed");
        };
        let before = exchange.balance_of(TOKEN_B, USER);
        exchange.take_events();

        assert_eq!(exchange.swap(USER, pair, Amount::ZERO, greedy, USER), Err(AmmError::K));
        assert_eq!(exchange.balance_of(TOKEN_B, USER), before);
        assert_eq!(exchange.pair(pair).map(Pair::get_reserves), reserves);
        assert!(exchange.events().is_empty());

        // the deposit is still there and a fair swap goes through
        assert_eq!(exchange.swap(USER, pair, Amount::ZERO, amt(906), USER), Ok(()));
        assert_eq!(exchange.balance_of(TOKEN_B, USER), Ok(amt(906)));
        assert_eq!(exchange.events().len(), 2);
    }

    #[test]
    fn clock_drives_observations() {
        let (mut exchange, _, pair) = exchange();
        exchange.set_timestamp(100);
        exchange.advance_time(20);
        assert_eq!(exchange.timestamp(), 120);
        assert_eq!(exchange.sync(USER, pair), Ok(()));
        let Some(state) = exchange.pair(pair) else {
            panic!("pair stored");
        };
        assert_eq!(state.get_reserves().2, 120);
        assert_eq!(state.get_observations(0).len(), 2);
    }

    #[test]
    fn share_operations() {
        let (mut exchange, _, pair) = exchange();
        assert_eq!(exchange.share_balance(pair, ADMIN), Ok(amt(9_000)));
        assert_eq!(exchange.approve_shares(ADMIN, pair, USER, amt(100)), Ok(()));
        assert_eq!(exchange.transfer_shares_from(USER, pair, ADMIN, USER, amt(100)), Ok(()));
        assert_eq!(exchange.share_balance(pair, USER), Ok(amt(100)));
        assert_eq!(
            exchange.transfer_shares(USER, pair, ADMIN, amt(101)),
            Err(AmmError::InsufficientBalance)
        );
        assert_eq!(
            exchange.share_balance(USER, ADMIN),
            Err(AmmError::PairNotFound)
        );
    }

    #[test]
    fn governance_passthrough() {
        let (mut exchange, _, _) = exchange();
        assert_eq!(exchange.set_fee_to(USER, USER), Err(AmmError::Forbidden));
        assert_eq!(exchange.set_fee_to_setter(ADMIN, USER), Ok(()));
        assert_eq!(exchange.set_fee_to(USER, USER), Ok(()));
        assert_eq!(exchange.factory().fee_to(), Some(USER));
    }
}
