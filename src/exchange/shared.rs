//! Lock-guarded exchange handle for concurrent hosts.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::Exchange;
use crate::token::InMemoryTokenBank;

/// A cloneable handle to one [`Exchange`] behind an exclusive lock.
///
/// Each closure passed to [`SharedExchange::with`] runs with the whole
/// exchange locked, so calls from different threads never interleave
/// inside a pair operation.
///
/// # Examples
///
/// ```
/// use stark_amm::config::ExchangeConfig;
/// use stark_amm::domain::Address;
/// use stark_amm::exchange::{Exchange, SharedExchange};
/// use stark_amm::token::InMemoryTokenBank;
///
/// let exchange = Exchange::new(Address::from_low_u64(1), InMemoryTokenBank::new(), &ExchangeConfig::default())
///     .expect("valid config");
/// let shared = SharedExchange::new(exchange);
/// let handle = shared.clone();
/// handle.with(|ex| ex.advance_time(10));
/// assert_eq!(shared.with(|ex| ex.timestamp()), 10);
/// ```
#[derive(Debug)]
pub struct SharedExchange<B = InMemoryTokenBank> {
    inner: Arc<Mutex<Exchange<B>>>,
}

impl<B> Clone for SharedExchange<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B> SharedExchange<B> {
    /// Wraps `exchange` for shared use.
    #[must_use]
    pub fn new(exchange: Exchange<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(exchange)),
        }
    }

    /// Runs `f` with exclusive access to the exchange.
    pub fn with<T>(&self, f: impl FnOnce(&mut Exchange<B>) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Locks the exchange until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, Exchange<B>> {
        self.inner.lock()
    }
}
