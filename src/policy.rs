//! Size and rescale policies.
//!
//! Both are pure functions of the observed length and the current ceiling, so
//! the deque can evaluate them inside the same critical section that applies
//! the resulting mutation.

use crate::{config::Capacity, error::ConfigError};

/// One end of a deque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    Head,
    Tail,
}

impl End {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            End::Head => End::Tail,
            End::Tail => End::Head,
        }
    }
}

/// Outcome of the size policy for a single push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// There is room, insert as is.
    Accept,
    /// At the ceiling; drop one element from the given end, then insert.
    Evict(End),
    /// At the ceiling without preemption.
    Reject,
}

/// Decides how a push at `end` is handled when the deque holds `len` elements.
#[inline]
pub fn admit(len: usize, capacity: Capacity, preemption: bool, end: End) -> Admission {
    match capacity.limit() {
        Some(limit) if len >= limit => {
            if preemption {
                Admission::Evict(end.opposite())
            } else {
                Admission::Reject
            }
        }
        _ => Admission::Accept,
    }
}

pub const DEFAULT_EXPAND_FACTOR: f64 = 0.75;
pub const DEFAULT_EXPAND_COEFFICIENT: f64 = 1.25;
pub const DEFAULT_SHRINK_FACTOR: f64 = 0.5;
pub const DEFAULT_SHRINK_COEFFICIENT: f64 = 1.25;

/// Load-factor thresholds for [`BoundedDeque::expand`](crate::BoundedDeque::expand)
/// and [`BoundedDeque::shrink`](crate::BoundedDeque::shrink).
///
/// Expansion fires once `len >= capacity * expand_factor` and multiplies the
/// ceiling by `expand_coefficient`. Shrinking fires once
/// `len <= capacity * shrink_factor` and divides the ceiling by
/// `shrink_coefficient`. The shrink factor is a low-water mark below 1, so a
/// well utilised deque is left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawRescalePolicy", into = "RawRescalePolicy")
)]
pub struct RescalePolicy {
    expand_factor: f64,
    expand_coefficient: f64,
    shrink_factor: f64,
    shrink_coefficient: f64,
}

impl Default for RescalePolicy {
    fn default() -> Self {
        Self {
            expand_factor: DEFAULT_EXPAND_FACTOR,
            expand_coefficient: DEFAULT_EXPAND_COEFFICIENT,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            shrink_coefficient: DEFAULT_SHRINK_COEFFICIENT,
        }
    }
}

impl RescalePolicy {
    pub fn new(
        expand_factor: f64,
        expand_coefficient: f64,
        shrink_factor: f64,
        shrink_coefficient: f64,
    ) -> Result<Self, ConfigError> {
        if !(expand_factor > 0.0 && expand_factor <= 1.0) {
            return Err(ConfigError::ExpandFactor(expand_factor));
        }
        if !(shrink_factor >= 0.0 && shrink_factor < 1.0) {
            return Err(ConfigError::ShrinkFactor(shrink_factor));
        }
        check_coefficient("expand", expand_coefficient)?;
        check_coefficient("shrink", shrink_coefficient)?;

        Ok(Self { expand_factor, expand_coefficient, shrink_factor, shrink_coefficient })
    }

    #[inline]
    pub fn expand_factor(&self) -> f64 {
        self.expand_factor
    }

    #[inline]
    pub fn expand_coefficient(&self) -> f64 {
        self.expand_coefficient
    }

    #[inline]
    pub fn shrink_factor(&self) -> f64 {
        self.shrink_factor
    }

    #[inline]
    pub fn shrink_coefficient(&self) -> f64 {
        self.shrink_coefficient
    }

    /// The grown ceiling, or `None` when the load is below the threshold.
    /// Growth is at least one slot so that small ceilings make progress.
    pub fn expanded(&self, capacity: usize, len: usize) -> Option<usize> {
        if (len as f64) < capacity as f64 * self.expand_factor {
            return None;
        }
        // truncates like the shrink path; float to int casts saturate
        let scaled = (capacity as f64 * self.expand_coefficient) as usize;
        let grown = scaled.max(capacity.saturating_add(1));
        (grown > capacity).then_some(grown)
    }

    /// The reduced ceiling, or `None` when the load is above the low-water
    /// mark. Never goes below `len` or below one.
    pub fn shrunk(&self, capacity: usize, len: usize) -> Option<usize> {
        if (len as f64) > capacity as f64 * self.shrink_factor {
            return None;
        }
        let target = (capacity as f64 / self.shrink_coefficient).floor() as usize;
        let target = target.max(len).max(1);
        (target < capacity).then_some(target)
    }
}

fn check_coefficient(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Coefficient { name, value })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct RawRescalePolicy {
    expand_factor: f64,
    expand_coefficient: f64,
    shrink_factor: f64,
    shrink_coefficient: f64,
}

#[cfg(feature = "serde")]
impl Default for RawRescalePolicy {
    fn default() -> Self {
        RescalePolicy::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<RescalePolicy> for RawRescalePolicy {
    fn from(p: RescalePolicy) -> Self {
        Self {
            expand_factor: p.expand_factor,
            expand_coefficient: p.expand_coefficient,
            shrink_factor: p.shrink_factor,
            shrink_coefficient: p.shrink_coefficient,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawRescalePolicy> for RescalePolicy {
    type Error = ConfigError;

    fn try_from(raw: RawRescalePolicy) -> Result<Self, Self::Error> {
        RescalePolicy::new(
            raw.expand_factor,
            raw.expand_coefficient,
            raw.shrink_factor,
            raw.shrink_coefficient,
        )
    }
}
