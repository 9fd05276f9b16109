//! Thread-safe double-ended queue with an optional size limit.
//!
//! Every operation takes the deque's reader/writer lock exactly once. The size
//! policy check and the mutation it allows happen under the same write guard,
//! so concurrent pushes can never take a bounded deque past its ceiling.
//!
//! Pushing into a full bounded deque either fails with [`DequeError::Full`] or,
//! with preemption enabled, evicts the element at the opposite end:
//!
//! ```
//! use bounded_deque::{BoundedDeque, DequeConfig};
//!
//! let deque = BoundedDeque::new(DequeConfig::bounded(3).with_preemption(true));
//! for i in 1..=3 {
//!     deque.push_head(i).unwrap();
//! }
//! assert_eq!(deque.push_head(4), Ok(Some(1)));
//! assert_eq!(deque.values(), vec![4, 3, 2]);
//! ```

use std::fmt;

use log::{debug, trace};
use parking_lot::RwLock;

use crate::{
    config::{Capacity, DequeConfig},
    error::{DequeError, Result},
    policy::{self, Admission, End},
    ring::RingBuffer,
};

pub struct BoundedDeque<T> {
    config: DequeConfig,
    state: RwLock<State<T>>,
}

struct State<T> {
    items: RingBuffer<T>,
    capacity: Capacity,
}

impl<T> State<T> {
    fn new(config: &DequeConfig) -> Self {
        Self {
            items: RingBuffer::with_capacity(config.initial_capacity()),
            capacity: config.capacity,
        }
    }

    fn push(&mut self, end: End, item: T, preemption: bool) -> Result<Option<T>> {
        let evicted = match policy::admit(self.items.len(), self.capacity, preemption, end) {
            Admission::Accept => None,
            Admission::Evict(from) => {
                trace!("deque at capacity {}, evicting from {from:?}", self.capacity);
                self.pop(from)
            }
            Admission::Reject => {
                trace!("deque at capacity {}, rejecting push at {end:?}", self.capacity);
                return Err(DequeError::Full);
            }
        };

        match end {
            End::Head => self.items.push_front(item),
            End::Tail => self.items.push_back(item),
        }
        Ok(evicted)
    }

    fn push_all<I>(&mut self, end: End, items: I, preemption: bool) -> Result<()>
    where
        I: Iterator<Item = T>,
    {
        for item in items {
            self.push(end, item, preemption)?;
        }
        Ok(())
    }

    #[inline]
    fn pop(&mut self, end: End) -> Option<T> {
        match end {
            End::Head => self.items.pop_front(),
            End::Tail => self.items.pop_back(),
        }
    }

    #[inline]
    fn peek(&self, end: End) -> Option<&T> {
        match end {
            End::Head => self.items.front(),
            End::Tail => self.items.back(),
        }
    }

    fn rescale(&mut self, new_limit: usize) {
        self.capacity = Capacity::bounded(new_limit);
        self.items.rescale_to(new_limit);
    }
}

impl<T> BoundedDeque<T> {
    /// Creates an empty deque. Preemption is switched off for unbounded
    /// configurations.
    pub fn new(mut config: DequeConfig) -> Self {
        config.preemption = config.preempts();
        let state = RwLock::new(State::new(&config));
        Self { config, state }
    }

    /// The configuration as normalised by [`BoundedDeque::new`].
    #[inline]
    pub fn config(&self) -> &DequeConfig {
        &self.config
    }

    #[inline]
    pub fn preemption(&self) -> bool {
        self.config.preemption
    }

    /// Current ceiling. Rescaling moves it away from the configured value
    /// until the next [`flush`](Self::flush).
    pub fn capacity(&self) -> Capacity {
        self.state.read().capacity
    }

    /// Number of elements currently stored.
    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    /// Whether the deque sits at its ceiling. Never true when unbounded.
    pub fn is_full(&self) -> bool {
        let state = self.state.read();
        state.capacity.limit().map_or(false, |limit| state.items.len() >= limit)
    }

    /// Inserts `item` at `end`.
    ///
    /// Returns the element evicted from the opposite end when a preempting
    /// deque was full, and [`DequeError::Full`] when a non-preempting one was.
    pub fn push(&self, end: End, item: T) -> Result<Option<T>> {
        self.state.write().push(end, item, self.config.preemption)
    }

    #[inline]
    pub fn push_head(&self, item: T) -> Result<Option<T>> {
        self.push(End::Head, item)
    }

    #[inline]
    pub fn push_tail(&self, item: T) -> Result<Option<T>> {
        self.push(End::Tail, item)
    }

    pub fn pop(&self, end: End) -> Result<T> {
        self.state.write().pop(end).ok_or(DequeError::Empty)
    }

    #[inline]
    pub fn pop_head(&self) -> Result<T> {
        self.pop(End::Head)
    }

    #[inline]
    pub fn pop_tail(&self) -> Result<T> {
        self.pop(End::Tail)
    }

    /// Pushes each item at `end` in iteration order under a single write lock.
    ///
    /// The batch is not atomic: on the first [`DequeError::Full`] the items
    /// already pushed stay in the deque, and the rejected item together with
    /// the rest of the batch is dropped. Elements evicted by preemption are
    /// dropped as well.
    pub fn push_all<I>(&self, end: End, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.state.write().push_all(end, items.into_iter(), self.config.preemption)
    }

    /// Like [`push_all`](Self::push_all), consuming `items` back to front.
    pub fn push_all_reversed<I>(&self, end: End, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.state.write().push_all(end, items.into_iter().rev(), self.config.preemption)
    }

    /// After `push_head_all([1, 2, 3])` the head is `3`.
    #[inline]
    pub fn push_head_all<I: IntoIterator<Item = T>>(&self, items: I) -> Result<()> {
        self.push_all(End::Head, items)
    }

    /// After `push_head_all_reversed([1, 2, 3])` the head is `1`.
    #[inline]
    pub fn push_head_all_reversed<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.push_all_reversed(End::Head, items)
    }

    #[inline]
    pub fn push_tail_all<I: IntoIterator<Item = T>>(&self, items: I) -> Result<()> {
        self.push_all(End::Tail, items)
    }

    #[inline]
    pub fn push_tail_all_reversed<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.push_all_reversed(End::Tail, items)
    }

    /// Flushes the deque and loads `items` so that they read head to tail in
    /// the given order. Items are pushed at the head starting from the last
    /// one, with the same partial application as
    /// [`push_all`](Self::push_all) when the deque fills up.
    pub fn replace<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut state = self.state.write();
        *state = State::new(&self.config);
        state.push_all(End::Head, items.into_iter().rev(), self.config.preemption)
    }

    /// Drops every element, reallocates storage at the configured initial
    /// size and restores the configured ceiling.
    pub fn flush(&self) {
        let mut state = self.state.write();
        debug!(
            "flushing deque of {} elements, capacity {} -> {}",
            state.items.len(),
            state.capacity,
            self.config.capacity
        );
        *state = State::new(&self.config);
    }

    /// Raises the ceiling of a bounded deque whose load reached the expand
    /// factor. Returns whether the ceiling changed. Element order is kept.
    pub fn expand(&self) -> bool {
        let mut state = self.state.write();
        let Some(limit) = state.capacity.limit() else {
            return false;
        };
        let len = state.items.len();

        match self.config.rescale.expanded(limit, len) {
            Some(grown) => {
                debug!("expanding deque capacity {limit} -> {grown} at len {len}");
                state.rescale(grown);
                true
            }
            None => false,
        }
    }

    /// Lowers the ceiling of a bounded deque whose load fell to the shrink
    /// factor. Returns whether the ceiling changed. No element is dropped.
    pub fn shrink(&self) -> bool {
        let mut state = self.state.write();
        let Some(limit) = state.capacity.limit() else {
            return false;
        };
        let len = state.items.len();

        match self.config.rescale.shrunk(limit, len) {
            Some(shrunk) => {
                debug!("shrinking deque capacity {limit} -> {shrunk} at len {len}");
                state.rescale(shrunk);
                true
            }
            None => false,
        }
    }

    /// Consumes the deque, returning its elements head to tail.
    pub fn into_values(self) -> Vec<T> {
        self.state.into_inner().items.into_vec()
    }
}

impl<T: Clone> BoundedDeque<T> {
    pub fn peek(&self, end: End) -> Result<T> {
        self.state.read().peek(end).cloned().ok_or(DequeError::Empty)
    }

    #[inline]
    pub fn peek_head(&self) -> Result<T> {
        self.peek(End::Head)
    }

    #[inline]
    pub fn peek_tail(&self) -> Result<T> {
        self.peek(End::Tail)
    }

    /// Snapshot of the elements, head to tail.
    pub fn values(&self) -> Vec<T> {
        self.state.read().items.iter().cloned().collect()
    }
}

impl<T> Default for BoundedDeque<T> {
    fn default() -> Self {
        Self::new(DequeConfig::default())
    }
}

impl<T> From<DequeConfig> for BoundedDeque<T> {
    fn from(config: DequeConfig) -> Self {
        Self::new(config)
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("BoundedDeque")
            .field("capacity", &state.capacity)
            .field("preemption", &self.config.preemption)
            .field("items", &state.items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn shareable_across_threads() {
        assert_send_sync::<BoundedDeque<String>>();
    }

    #[test]
    fn unbounded_config_drops_preemption() {
        let deque = BoundedDeque::<u8>::new(DequeConfig::unbounded().with_preemption(true));
        assert!(!deque.preemption());
        assert!(!deque.is_full());
    }

    #[test]
    fn storage_is_preallocated_to_the_limit() {
        let deque = BoundedDeque::<u64>::new(DequeConfig::bounded(5));
        assert_eq!(deque.state.read().items.capacity(), 5);

        let deque = BoundedDeque::<u64>::default();
        assert_eq!(deque.state.read().items.capacity(), crate::config::DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn eviction_keeps_len_at_the_ceiling_without_reallocating() {
        let deque = BoundedDeque::new(DequeConfig::bounded(2).with_preemption(true));
        for i in 0..10 {
            deque.push_tail(i).unwrap();
            assert!(deque.len() <= 2);
        }
        assert_eq!(deque.state.read().items.capacity(), 2);
        assert_eq!(deque.values(), vec![8, 9]);
    }

    #[test]
    fn into_values_needs_no_clone() {
        struct Token(u32);

        let deque = BoundedDeque::default();
        deque.push_tail(Token(1)).unwrap();
        deque.push_head(Token(0)).unwrap();
        let tokens: Vec<u32> = deque.into_values().into_iter().map(|t| t.0).collect();
        assert_eq!(tokens, vec![0, 1]);
    }

    #[test]
    fn debug_shows_policy_and_items() {
        let deque = BoundedDeque::new(DequeConfig::bounded(4));
        deque.push_tail_all([1, 2]).unwrap();
        assert_eq!(
            format!("{deque:?}"),
            "BoundedDeque { capacity: Bounded(4), preemption: false, items: [1, 2] }"
        );
    }
}
