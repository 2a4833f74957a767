//! Bounded price-observation history.

use std::collections::VecDeque;

use crate::domain::Observation;

/// Ring buffer of [`Observation`]s with a fixed capacity.
///
/// Appending to a full buffer evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationBuffer {
    capacity: usize,
    entries: VecDeque<Observation>,
}

impl ObservationBuffer {
    /// Creates an empty buffer holding at most `capacity` entries
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&Observation> {
        self.entries.back()
    }

    /// Appends `observation`, evicting the oldest entry when full.
    pub fn record(&mut self, observation: Observation) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(observation);
    }

    /// The most recent `n` entries in chronological order, or all of them
    /// when `n` is zero or exceeds the buffer length.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<Observation> {
        let len = self.entries.len();
        let take = if n == 0 || n > len { len } else { n };
        self.entries.iter().skip(len - take).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;

    fn obs(t: u64) -> Observation {
        Observation::new(t, U256::from(t), U256::ZERO)
    }

    #[test]
    fn evicts_oldest() {
        let mut buf = ObservationBuffer::new(3);
        for t in 1..=5 {
            buf.record(obs(t));
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.recent(0), vec![obs(3), obs(4), obs(5)]);
    }

    #[test]
    fn recent_is_chronological() {
        let mut buf = ObservationBuffer::new(8);
        for t in 1..=4 {
            buf.record(obs(t));
        }
        assert_eq!(buf.recent(2), vec![obs(3), obs(4)]);
        assert_eq!(buf.recent(10).len(), 4);
        assert_eq!(buf.latest(), Some(&obs(4)));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut buf = ObservationBuffer::new(0);
        assert!(buf.is_empty());
        buf.record(obs(1));
        buf.record(obs(2));
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.recent(0), vec![obs(2)]);
    }
}
