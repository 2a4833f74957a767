//! Per-call execution context.
//!
//! A [`CallContext`] bundles everything a state-changing operation needs
//! from its host: the token collaborator, the identity of the caller, the
//! block timestamp and the event log of the current call.

use crate::domain::{Address, Event};

/// Mutable handle passed through every state-changing operation.
///
/// The context borrows the bank and the event log of one call; when the
/// call fails the host discards both.
///
/// # Examples
///
/// ```
/// use stark_amm::context::CallContext;
/// use stark_amm::domain::Address;
/// use stark_amm::token::InMemoryTokenBank;
///
/// let mut bank = InMemoryTokenBank::new();
/// let mut events = Vec::new();
/// let mut ctx = CallContext::new(&mut bank, Address::from_low_u64(1), 42, &mut events);
///
/// let router = Address::from_low_u64(99);
/// let inner = ctx.as_caller(router);
/// assert_eq!(inner.caller(), router);
/// assert_eq!(inner.timestamp(), 42);
/// ```
#[derive(Debug)]
pub struct CallContext<'a, B> {
    bank: &'a mut B,
    caller: Address,
    timestamp: u64,
    events: &'a mut Vec<Event>,
}

impl<'a, B> CallContext<'a, B> {
    /// Creates a context for a call made by `caller` at `timestamp`.
    pub fn new(bank: &'a mut B, caller: Address, timestamp: u64, events: &'a mut Vec<Event>) -> Self {
        Self {
            bank,
            caller,
            timestamp,
            events,
        }
    }

    /// Account that invoked the current operation.
    #[must_use]
    pub const fn caller(&self) -> Address {
        self.caller
    }

    /// Block timestamp of the call, in seconds.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Read access to the token collaborator.
    pub fn bank(&self) -> &B {
        self.bank
    }

    /// Write access to the token collaborator.
    pub fn bank_mut(&mut self) -> &mut B {
        self.bank
    }

    /// Appends an event to the call's log.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Write access to the call's event log.
    pub fn events_mut(&mut self) -> &mut Vec<Event> {
        self.events
    }

    /// Reborrows the context with a different caller, as when the router
    /// calls a pair on a user's behalf.
    pub fn as_caller(&mut self, caller: Address) -> CallContext<'_, B> {
        CallContext {
            bank: &mut *self.bank,
            caller,
            timestamp: self.timestamp,
            events: &mut *self.events,
        }
    }
}
