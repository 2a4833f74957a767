//! Arguments of the stateful router operations.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, CurveId, Route};

/// Deposit into the `(token_a, token_b, curve)` pair, creating it if
/// needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidity {
    /// First token, in caller order.
    pub token_a: Address,
    /// Second token, in caller order.
    pub token_b: Address,
    /// Curve of the target pair.
    pub curve: CurveId,
    /// Most of `token_a` the caller is willing to deposit.
    pub amount_a_desired: Amount,
    /// Most of `token_b` the caller is willing to deposit.
    pub amount_b_desired: Amount,
    /// Least of `token_a` the caller accepts to deposit.
    pub amount_a_min: Amount,
    /// Least of `token_b` the caller accepts to deposit.
    pub amount_b_min: Amount,
    /// Recipient of the liquidity shares.
    pub to: Address,
    /// Last timestamp at which the call is valid.
    pub deadline: u64,
}

/// Withdrawal from the `(token_a, token_b, curve)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidity {
    /// First token, in caller order.
    pub token_a: Address,
    /// Second token, in caller order.
    pub token_b: Address,
    /// Curve of the pair.
    pub curve: CurveId,
    /// Shares to redeem; the router must be allowed to move them.
    pub liquidity: Amount,
    /// Least of `token_a` the caller accepts back.
    pub amount_a_min: Amount,
    /// Least of `token_b` the caller accepts back.
    pub amount_b_min: Amount,
    /// Recipient of the redeemed tokens.
    pub to: Address,
    /// Last timestamp at which the call is valid.
    pub deadline: u64,
}

/// Sell an exact input along `routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExactIn {
    /// Input paid into the first hop.
    pub amount_in: Amount,
    /// Least output accepted from the last hop.
    pub amount_out_min: Amount,
    /// Hops, first to last.
    pub routes: Vec<Route>,
    /// Recipient of the final output.
    pub to: Address,
    /// Last timestamp at which the call is valid.
    pub deadline: u64,
}

/// Buy an exact output along `routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExactOut {
    /// Output received from the last hop.
    pub amount_out: Amount,
    /// Most input accepted into the first hop.
    pub amount_in_max: Amount,
    /// Hops, first to last.
    pub routes: Vec<Route>,
    /// Recipient of the final output.
    pub to: Address,
    /// Last timestamp at which the call is valid.
    pub deadline: u64,
}
