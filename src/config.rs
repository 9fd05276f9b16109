use std::{fmt, num::NonZeroUsize};

use crate::policy::RescalePolicy;

/// Storage hint for deques without a size limit.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Ceiling on the number of elements a deque holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "i64", into = "i64")
)]
pub enum Capacity {
    #[default]
    Unbounded,
    Bounded(NonZeroUsize),
}

impl Capacity {
    /// `0` means unbounded.
    #[inline]
    pub const fn bounded(limit: usize) -> Self {
        match NonZeroUsize::new(limit) {
            Some(limit) => Capacity::Bounded(limit),
            None => Capacity::Unbounded,
        }
    }

    /// Interprets a signed size limit, where anything `<= 0` is unbounded.
    pub fn from_limit(limit: i64) -> Self {
        usize::try_from(limit)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Capacity::Unbounded, Capacity::Bounded)
    }

    #[inline]
    pub const fn limit(self) -> Option<usize> {
        match self {
            Capacity::Unbounded => None,
            Capacity::Bounded(limit) => Some(limit.get()),
        }
    }

    #[inline]
    pub const fn is_bounded(self) -> bool {
        matches!(self, Capacity::Bounded(_))
    }

    /// The limit as a signed integer, `-1` when unbounded.
    pub fn as_sentinel(self) -> i64 {
        match self {
            Capacity::Unbounded => -1,
            Capacity::Bounded(limit) => i64::try_from(limit.get()).unwrap_or(i64::MAX),
        }
    }
}

impl From<i64> for Capacity {
    fn from(limit: i64) -> Self {
        Capacity::from_limit(limit)
    }
}

impl From<Capacity> for i64 {
    fn from(capacity: Capacity) -> Self {
        capacity.as_sentinel()
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Unbounded => f.write_str("unbounded"),
            Capacity::Bounded(limit) => write!(f, "{limit}"),
        }
    }
}

/// Policy a [`BoundedDeque`](crate::BoundedDeque) is built with.
///
/// ```
/// use bounded_deque::{BoundedDeque, DequeConfig};
///
/// let deque = BoundedDeque::<u32>::new(DequeConfig::bounded(16).with_preemption(true));
/// assert_eq!(deque.capacity().limit(), Some(16));
/// assert!(deque.preemption());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct DequeConfig {
    #[cfg_attr(feature = "serde", serde(rename = "size_limit"))]
    pub capacity: Capacity,
    /// Evict from the opposite end instead of rejecting a push into a full
    /// deque. Has no effect when unbounded.
    pub preemption: bool,
    pub rescale: RescalePolicy,
}

impl DequeConfig {
    #[inline]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// `0` means unbounded.
    #[inline]
    pub fn bounded(limit: usize) -> Self {
        Self { capacity: Capacity::bounded(limit), ..Self::default() }
    }

    #[inline]
    pub fn with_preemption(mut self, preemption: bool) -> Self {
        self.preemption = preemption;
        self
    }

    #[inline]
    pub fn with_rescale(mut self, rescale: RescalePolicy) -> Self {
        self.rescale = rescale;
        self
    }

    /// Whether pushes into a full deque evict. Always false when unbounded.
    #[inline]
    pub fn preempts(&self) -> bool {
        self.preemption && self.capacity.is_bounded()
    }

    /// Slots allocated up front and after a flush.
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.capacity.limit().unwrap_or(DEFAULT_INITIAL_CAPACITY)
    }
}
