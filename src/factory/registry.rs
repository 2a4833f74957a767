//! Pair registry and governance.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::context::CallContext;
use crate::curves::CurveKind;
use crate::domain::{Address, Amount, CurveId, Event, PairKey};
use crate::error::AmmError;
use crate::pair::Pair;
use crate::traits::{PricingCurve, SwapCallee, TokenBank};

/// Registry mapping `(token A, token B, curve)` to exactly one [`Pair`].
///
/// The factory owns every pair it creates (arena style) and is the only
/// place that knows the protocol-fee recipient; pair operations routed
/// through it receive `fee_to` automatically.
///
/// # Governance
///
/// `fee_to_setter` may whitelist curves, set `fee_to` and hand its own
/// role to another account.  Once rotated, the previous setter has no
/// authority left.
///
/// # Examples
///
/// ```
/// use stark_amm::context::CallContext;
/// use stark_amm::curves::{CurveKind, VolatileCurve};
/// use stark_amm::domain::{Address, Amount, Decimals};
/// use stark_amm::factory::Factory;
/// use stark_amm::token::InMemoryTokenBank;
///
/// let admin = Address::from_low_u64(1);
/// let (a, b) = (Address::from_low_u64(0xa), Address::from_low_u64(0xb));
///
/// let mut bank = InMemoryTokenBank::new();
/// bank.deploy(a, Decimals::MAX, Amount::ZERO, admin).expect("fresh");
/// bank.deploy(b, Decimals::MAX, Amount::ZERO, admin).expect("fresh");
///
/// let mut factory = Factory::new(Address::from_low_u64(0xf), admin, 16);
/// let volatile = factory
///     .add_curve(admin, CurveKind::from(VolatileCurve::new()))
///     .expect("setter may whitelist");
///
/// let mut events = Vec::new();
/// let mut ctx = CallContext::new(&mut bank, admin, 0, &mut events);
/// let pair = factory.create_pair(&mut ctx, b, a, volatile).expect("new pair");
/// assert_eq!(factory.get_pair(a, b, volatile), Some(pair));
/// assert_eq!(factory.all_pairs_length(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Factory {
    address: Address,
    fee_to: Option<Address>,
    fee_to_setter: Address,
    allowed_curves: BTreeMap<CurveId, CurveKind>,
    pairs: HashMap<PairKey, usize>,
    by_address: HashMap<Address, usize>,
    all_pairs: Vec<Pair>,
    observation_capacity: usize,
}

impl Factory {
    /// Creates an empty registry governed by `fee_to_setter`.
    ///
    /// `observation_capacity` bounds the price history of every pair the
    /// factory creates.
    #[must_use]
    pub fn new(address: Address, fee_to_setter: Address, observation_capacity: usize) -> Self {
        Self {
            address,
            fee_to: None,
            fee_to_setter,
            allowed_curves: BTreeMap::new(),
            pairs: HashMap::new(),
            by_address: HashMap::new(),
            all_pairs: Vec::new(),
            observation_capacity,
        }
    }

    /// Address of the factory.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    // -----------------------------------------------------------------------
    // Curves
    // -----------------------------------------------------------------------

    /// Whitelists `curve` and returns its id.
    ///
    /// Adding a curve that is already allowed is a no-op returning the
    /// same id.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee-to setter.
    pub fn add_curve(&mut self, caller: Address, curve: CurveKind) -> Result<CurveId, AmmError> {
        self.ensure_setter(caller)?;
        let id = curve.id();
        if self.allowed_curves.insert(id, curve).is_none() {
            info!(curve = %id, kind = curve.name(), "curve whitelisted");
        }
        Ok(id)
    }

    /// Returns `true` if pairs may be created on `curve`.
    #[must_use]
    pub fn is_curve_allowed(&self, curve: CurveId) -> bool {
        self.allowed_curves.contains_key(&curve)
    }

    /// The whitelisted implementation registered under `curve`.
    #[must_use]
    pub fn curve(&self, curve: CurveId) -> Option<&CurveKind> {
        self.allowed_curves.get(&curve)
    }

    /// Ids of every whitelisted curve, in id order.
    pub fn allowed_curves(&self) -> impl Iterator<Item = CurveId> + '_ {
        self.allowed_curves.keys().copied()
    }

    // -----------------------------------------------------------------------
    // Pairs
    // -----------------------------------------------------------------------

    /// Creates and registers the pair for `(token_a, token_b, curve)`.
    ///
    /// Token order does not matter; the smaller address becomes the base
    /// token.  Emits [`Event::PairCreated`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] / [`AmmError::ZeroAddress`] for
    ///   a malformed key.
    /// - [`AmmError::CurveNotAllowed`] if `curve` is not whitelisted.
    /// - [`AmmError::PairExists`] if the key is already registered.
    /// - [`AmmError::UnknownToken`] if the bank does not know a token.
    pub fn create_pair<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        token_a: Address,
        token_b: Address,
        curve: CurveId,
    ) -> Result<Address, AmmError> {
        let key = PairKey::new(token_a, token_b, curve)?;
        let kind = *self.allowed_curves.get(&curve).ok_or(AmmError::CurveNotAllowed)?;
        if self.pairs.contains_key(&key) {
            return Err(AmmError::PairExists);
        }
        let base_decimals = ctx.bank().decimals(key.base())?;
        let quote_decimals = ctx.bank().decimals(key.quote())?;

        let pair = Pair::new(
            self.address,
            key,
            base_decimals,
            quote_decimals,
            kind,
            self.observation_capacity,
        );
        let address = pair.address();
        if self.by_address.contains_key(&address) {
            return Err(AmmError::PairExists);
        }

        let index = self.all_pairs.len();
        self.all_pairs.push(pair);
        self.pairs.insert(key, index);
        self.by_address.insert(address, index);

        let count = self.all_pairs.len();
        ctx.emit(Event::PairCreated {
            base: key.base(),
            quote: key.quote(),
            curve,
            pair: address,
            count,
        });
        info!(base = %key.base(), quote = %key.quote(), %curve, pair = %address, count, "pair created");
        Ok(address)
    }

    /// Address of the pair for `(token_a, token_b, curve)` in either
    /// order, or `None` if it was never created.
    #[must_use]
    pub fn get_pair(&self, token_a: Address, token_b: Address, curve: CurveId) -> Option<Address> {
        let key = PairKey::new(token_a, token_b, curve).ok()?;
        let index = *self.pairs.get(&key)?;
        self.all_pairs.get(index).map(Pair::address)
    }

    /// Address of the `index`-th created pair.
    #[must_use]
    pub fn all_pairs(&self, index: usize) -> Option<Address> {
        self.all_pairs.get(index).map(Pair::address)
    }

    /// Number of pairs created so far.
    #[must_use]
    pub fn all_pairs_length(&self) -> usize {
        self.all_pairs.len()
    }

    /// Every pair, in creation order.
    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.all_pairs.iter()
    }

    /// The pair registered at `address`.
    #[must_use]
    pub fn pair(&self, address: Address) -> Option<&Pair> {
        let index = *self.by_address.get(&address)?;
        self.all_pairs.get(index)
    }

    /// Mutable access to the pair registered at `address`.
    pub fn pair_mut(&mut self, address: Address) -> Option<&mut Pair> {
        let index = *self.by_address.get(&address)?;
        self.all_pairs.get_mut(index)
    }

    fn existing_pair_mut(&mut self, address: Address) -> Result<&mut Pair, AmmError> {
        self.pair_mut(address).ok_or(AmmError::PairNotFound)
    }

    // -----------------------------------------------------------------------
    // Fee governance
    // -----------------------------------------------------------------------

    /// Recipient of the protocol fee, if switched on.
    #[must_use]
    pub const fn fee_to(&self) -> Option<Address> {
        self.fee_to
    }

    /// Governance account.
    #[must_use]
    pub const fn fee_to_setter(&self) -> Address {
        self.fee_to_setter
    }

    fn ensure_setter(&self, caller: Address) -> Result<(), AmmError> {
        if caller == self.fee_to_setter {
            Ok(())
        } else {
            Err(AmmError::Forbidden)
        }
    }

    /// Sets the protocol-fee recipient; the zero address switches the fee
    /// off.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee-to setter.
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Address) -> Result<(), AmmError> {
        self.ensure_setter(caller)?;
        self.fee_to = (!fee_to.is_zero()).then_some(fee_to);
        info!(%fee_to, enabled = self.fee_to.is_some(), "protocol fee recipient set");
        Ok(())
    }

    /// Hands the governance role to `setter`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] unless `caller` is the current setter.
    /// - [`AmmError::ZeroAddress`] if `setter` is the zero address.
    pub fn set_fee_to_setter(&mut self, caller: Address, setter: Address) -> Result<(), AmmError> {
        self.ensure_setter(caller)?;
        if setter.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        self.fee_to_setter = setter;
        info!(previous = %caller, %setter, "fee setter rotated");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pair operations
    // -----------------------------------------------------------------------

    /// [`Pair::mint`] on the pair at `pair` with the current fee recipient.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or any error of [`Pair::mint`].
    pub fn mint<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        pair: Address,
        to: Address,
    ) -> Result<Amount, AmmError> {
        let fee_to = self.fee_to;
        self.existing_pair_mut(pair)?.mint(ctx, fee_to, to)
    }

    /// [`Pair::burn`] on the pair at `pair` with the current fee recipient.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or any error of [`Pair::burn`].
    pub fn burn<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        pair: Address,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let fee_to = self.fee_to;
        self.existing_pair_mut(pair)?.burn(ctx, fee_to, to)
    }

    /// [`Pair::swap`] on the pair at `pair`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or any error of [`Pair::swap`].
    pub fn swap<B: TokenBank>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        pair: Address,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        to: Address,
        data: &[u8],
    ) -> Result<(), AmmError> {
        self.existing_pair_mut(pair)?
            .swap(ctx, amount_base_out, amount_quote_out, to, data)
    }

    /// [`Pair::swap_with_callee`] on the pair at `pair`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or any error of
    /// [`Pair::swap_with_callee`].
    #[allow(clippy::too_many_arguments)]
    pub fn swap_with_callee<B: TokenBank, C: SwapCallee<B>>(
        &mut self,
        ctx: &mut CallContext<'_, B>,
        pair: Address,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        to: Address,
        data: &[u8],
        callee: &mut C,
    ) -> Result<(), AmmError> {
        self.existing_pair_mut(pair)?
            .swap_with_callee(ctx, amount_base_out, amount_quote_out, to, data, callee)
    }

    /// [`Pair::skim`] on the pair at `pair`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or token collaborator errors.
    pub fn skim<B: TokenBank>(&mut self, ctx: &mut CallContext<'_, B>, pair: Address, to: Address) -> Result<(), AmmError> {
        self.existing_pair_mut(pair)?.skim(ctx, to)
    }

    /// [`Pair::sync`] on the pair at `pair`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`], or token collaborator errors.
    pub fn sync<B: TokenBank>(&mut self, ctx: &mut CallContext<'_, B>, pair: Address) -> Result<(), AmmError> {
        self.existing_pair_mut(pair)?.sync(ctx)
    }
}
