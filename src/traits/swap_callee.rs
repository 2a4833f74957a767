//! Flash-swap callback.

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Receiver of a flash swap.
///
/// When a swap carries non-empty `data`, the pair transfers the requested
/// outputs first and then calls [`SwapCallee::on_swap`].  The callee may
/// use the tokens however it likes as long as, by the time it returns,
/// the pair holds enough to pass the invariant check.
pub trait SwapCallee<B> {
    /// Called by `pair` after the optimistic transfer.
    ///
    /// # Errors
    ///
    /// Any error aborts the swap.
    fn on_swap(
        &mut self,
        bank: &mut B,
        pair: Address,
        sender: Address,
        amount_base_out: Amount,
        amount_quote_out: Amount,
        data: &[u8],
    ) -> Result<(), AmmError>;
}
