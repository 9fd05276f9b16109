//! A thread-safe double-ended queue with an optional size limit.
//!
//! [`BoundedDeque`] stores its elements in a [`RingBuffer`] behind a single
//! reader/writer lock. A bounded deque either rejects pushes once full or, with
//! preemption enabled, evicts the element at the opposite end. Its ceiling can
//! be rescaled on demand through [`BoundedDeque::expand`] and
//! [`BoundedDeque::shrink`] according to a [`RescalePolicy`].
//!
//! ```
//! use bounded_deque::{BoundedDeque, DequeConfig, DequeError};
//!
//! let deque = BoundedDeque::new(DequeConfig::bounded(2));
//! deque.push_tail("a")?;
//! deque.push_tail("b")?;
//! assert_eq!(deque.push_tail("c"), Err(DequeError::Full));
//! assert_eq!(deque.pop_head()?, "a");
//! # Ok::<(), DequeError>(())
//! ```

mod config;
mod deque;
mod error;
mod policy;
pub mod ring;

pub use config::{Capacity, DequeConfig, DEFAULT_INITIAL_CAPACITY};
pub use deque::BoundedDeque;
pub use error::{ConfigError, DequeError, Result};
pub use policy::{
    admit, Admission, End, RescalePolicy, DEFAULT_EXPAND_COEFFICIENT, DEFAULT_EXPAND_FACTOR,
    DEFAULT_SHRINK_COEFFICIENT, DEFAULT_SHRINK_FACTOR,
};
pub use ring::RingBuffer;
