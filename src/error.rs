use thiserror::Error;

pub type Result<T, E = DequeError> = std::result::Result<T, E>;

/// Failure of a single deque operation. The deque is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DequeError {
    /// Pop or peek on a deque with no elements.
    #[error("empty deque")]
    Empty,
    /// Push into a saturated bounded deque that does not preempt.
    #[error("deque full")]
    Full,
}

/// Rejected [`RescalePolicy`](crate::RescalePolicy) parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("expand factor must lie in (0, 1], got {0}")]
    ExpandFactor(f64),
    #[error("shrink factor must lie in [0, 1), got {0}")]
    ShrinkFactor(f64),
    #[error("{name} coefficient must be finite and greater than 1, got {value}")]
    Coefficient { name: &'static str, value: f64 },
}
