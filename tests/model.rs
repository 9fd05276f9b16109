//! Random operation sequences checked against a `VecDeque` model.

use std::collections::VecDeque;

use bounded_deque::{BoundedDeque, DequeConfig, DequeError, RescalePolicy};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    PushHead(i32),
    PushTail(i32),
    PopHead,
    PopTail,
    PeekHead,
    PeekTail,
    PushHeadAll(Vec<i32>),
    PushTailAllReversed(Vec<i32>),
    Replace(Vec<i32>),
    Flush,
    Expand,
    Shrink,
}

fn op() -> impl Strategy<Value = Op> {
    let batch = || prop::collection::vec(any::<i32>(), 0..8);
    prop_oneof![
        4 => any::<i32>().prop_map(Op::PushHead),
        4 => any::<i32>().prop_map(Op::PushTail),
        2 => Just(Op::PopHead),
        2 => Just(Op::PopTail),
        1 => Just(Op::PeekHead),
        1 => Just(Op::PeekTail),
        1 => batch().prop_map(Op::PushHeadAll),
        1 => batch().prop_map(Op::PushTailAllReversed),
        1 => batch().prop_map(Op::Replace),
        1 => Just(Op::Flush),
        1 => Just(Op::Expand),
        1 => Just(Op::Shrink),
    ]
}

struct Model {
    items: VecDeque<i32>,
    limit: Option<usize>,
    configured: Option<usize>,
    preemption: bool,
    rescale: RescalePolicy,
}

impl Model {
    fn push_head(&mut self, v: i32) -> Result<Option<i32>, DequeError> {
        let evicted = match self.limit {
            Some(limit) if self.items.len() >= limit => {
                if !self.preemption {
                    return Err(DequeError::Full);
                }
                self.items.pop_back()
            }
            _ => None,
        };
        self.items.push_front(v);
        Ok(evicted)
    }

    fn push_tail(&mut self, v: i32) -> Result<Option<i32>, DequeError> {
        let evicted = match self.limit {
            Some(limit) if self.items.len() >= limit => {
                if !self.preemption {
                    return Err(DequeError::Full);
                }
                self.items.pop_front()
            }
            _ => None,
        };
        self.items.push_back(v);
        Ok(evicted)
    }

    fn flush(&mut self) {
        self.items.clear();
        self.limit = self.configured;
    }
}

fn check(config: DequeConfig, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let deque = BoundedDeque::new(config);
    let mut model = Model {
        items: VecDeque::new(),
        limit: config.capacity.limit(),
        configured: config.capacity.limit(),
        preemption: config.preempts(),
        rescale: config.rescale,
    };

    for op in ops {
        match op {
            Op::PushHead(v) => prop_assert_eq!(deque.push_head(v), model.push_head(v)),
            Op::PushTail(v) => prop_assert_eq!(deque.push_tail(v), model.push_tail(v)),
            Op::PopHead => {
                let expected = model.items.pop_front().ok_or(DequeError::Empty);
                prop_assert_eq!(deque.pop_head(), expected);
            }
            Op::PopTail => {
                let expected = model.items.pop_back().ok_or(DequeError::Empty);
                prop_assert_eq!(deque.pop_tail(), expected);
            }
            Op::PeekHead => {
                let expected = model.items.front().copied().ok_or(DequeError::Empty);
                prop_assert_eq!(deque.peek_head(), expected);
            }
            Op::PeekTail => {
                let expected = model.items.back().copied().ok_or(DequeError::Empty);
                prop_assert_eq!(deque.peek_tail(), expected);
            }
            Op::PushHeadAll(batch) => {
                let expected = batch.iter().try_for_each(|&v| model.push_head(v).map(drop));
                prop_assert_eq!(deque.push_head_all(batch), expected);
            }
            Op::PushTailAllReversed(batch) => {
                let expected = batch.iter().rev().try_for_each(|&v| model.push_tail(v).map(drop));
                prop_assert_eq!(deque.push_tail_all_reversed(batch), expected);
            }
            Op::Replace(batch) => {
                model.flush();
                let expected = batch.iter().rev().try_for_each(|&v| model.push_head(v).map(drop));
                prop_assert_eq!(deque.replace(batch), expected);
            }
            Op::Flush => {
                deque.flush();
                model.flush();
            }
            Op::Expand => {
                let len = model.items.len();
                let grown = model.limit.and_then(|limit| model.rescale.expanded(limit, len));
                if grown.is_some() {
                    model.limit = grown;
                }
                prop_assert_eq!(deque.expand(), grown.is_some());
            }
            Op::Shrink => {
                let len = model.items.len();
                let shrunk = model.limit.and_then(|limit| model.rescale.shrunk(limit, len));
                if shrunk.is_some() {
                    model.limit = shrunk;
                }
                prop_assert_eq!(deque.shrink(), shrunk.is_some());
            }
        }

        prop_assert_eq!(deque.capacity().limit(), model.limit);
        prop_assert_eq!(deque.len(), model.items.len());
        if let Some(limit) = model.limit {
            prop_assert!(deque.len() <= limit);
        }
    }

    prop_assert_eq!(deque.into_values(), Vec::from(model.items));
    Ok(())
}

proptest! {
    #[test]
    fn unbounded_matches_model(ops in prop::collection::vec(op(), 0..200)) {
        check(DequeConfig::unbounded(), ops)?;
    }

    #[test]
    fn bounded_matches_model(limit in 1usize..12, ops in prop::collection::vec(op(), 0..200)) {
        check(DequeConfig::bounded(limit), ops)?;
    }

    #[test]
    fn preempting_matches_model(limit in 1usize..12, ops in prop::collection::vec(op(), 0..200)) {
        check(DequeConfig::bounded(limit).with_preemption(true), ops)?;
    }
}
