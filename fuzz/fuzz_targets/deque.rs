#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use bounded_deque::{BoundedDeque, DequeConfig, DequeError, RingBuffer};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    limit: u8,
    preemption: bool,
    ops: Vec<Op>,
}

#[derive(Arbitrary, Debug)]
enum Op {
    Back,
    Equals,
    Expand,
    Flush,
    Front,
    Iter,
    Len,
    PopBack,
    PopFront,
    PushBack(i32),
    PushBackAll(Vec<i32>),
    PushFront(i32),
    PushFrontAllReversed(Vec<i32>),
    Replace(Vec<i32>),
    Shrink,
}

fuzz_target!(|input: Input| { fuzz(&input) });

fn push(
    v: &mut VecDeque<i32>,
    limit: Option<usize>,
    preemption: bool,
    front: bool,
    i: i32,
) -> Result<Option<i32>, DequeError> {
    let evicted = match limit {
        Some(limit) if v.len() >= limit => {
            if !preemption {
                return Err(DequeError::Full);
            }
            if front { v.pop_back() } else { v.pop_front() }
        }
        _ => None,
    };
    if front {
        v.push_front(i)
    } else {
        v.push_back(i)
    }
    Ok(evicted)
}

fn fuzz(input: &Input) {
    let config = DequeConfig::bounded(input.limit as usize).with_preemption(input.preemption);
    let preemption = config.preempts();
    let mut limit = config.capacity.limit();

    let d = BoundedDeque::<i32>::new(config);
    let mut r = RingBuffer::<i32>::new();
    let mut v = VecDeque::<i32>::new();

    for op in &input.ops {
        match op {
            Op::Back => {
                assert_eq!(d.peek_tail().ok(), v.back().copied());
                assert_eq!(r.back(), v.back());
            }
            Op::Equals => {
                assert!(d.values().iter().eq(v.iter()));
            }
            Op::Expand => {
                let grown = limit.and_then(|l| config.rescale.expanded(l, v.len()));
                assert_eq!(d.expand(), grown.is_some());
                limit = grown.or(limit);
                if let Some(l) = limit {
                    r.rescale_to(l);
                }
            }
            Op::Flush => {
                d.flush();
                r.clear();
                v.clear();
                limit = config.capacity.limit();
            }
            Op::Front => {
                assert_eq!(d.peek_head().ok(), v.front().copied());
                assert_eq!(r.front(), v.front());
            }
            Op::Iter => {
                let mut r_iter = r.iter();
                let mut v_iter = v.iter();
                while v_iter.len() > 0 {
                    if fastrand::bool() {
                        assert_eq!(r_iter.next(), v_iter.next());
                    } else {
                        assert_eq!(r_iter.next_back(), v_iter.next_back());
                    }
                }
                assert_eq!(r_iter.next(), None);
            }
            Op::Len => {
                assert_eq!(d.len(), v.len());
                assert_eq!(r.len(), v.len());
                if let Some(l) = limit {
                    assert!(d.len() <= l);
                }
            }
            Op::PopBack => {
                assert_eq!(d.pop_tail().ok(), v.back().copied());
                assert_eq!(r.pop_back(), v.pop_back());
            }
            Op::PopFront => {
                assert_eq!(d.pop_head().ok(), v.front().copied());
                assert_eq!(r.pop_front(), v.pop_front());
            }
            &Op::PushBack(i) => {
                let expected = push(&mut v, limit, preemption, false, i);
                if let Ok(evicted) = expected {
                    if evicted.is_some() {
                        r.pop_front();
                    }
                    r.push_back(i);
                }
                assert_eq!(d.push_tail(i), expected);
            }
            &Op::PushFront(i) => {
                let expected = push(&mut v, limit, preemption, true, i);
                if let Ok(evicted) = expected {
                    if evicted.is_some() {
                        r.pop_back();
                    }
                    r.push_front(i);
                }
                assert_eq!(d.push_head(i), expected);
            }
            Op::PushBackAll(items) => {
                let expected = items
                    .iter()
                    .try_for_each(|&i| push(&mut v, limit, preemption, false, i).map(drop));
                assert_eq!(d.push_tail_all(items.iter().copied()), expected);
                r = v.iter().copied().collect();
            }
            Op::PushFrontAllReversed(items) => {
                let expected = items
                    .iter()
                    .rev()
                    .try_for_each(|&i| push(&mut v, limit, preemption, true, i).map(drop));
                assert_eq!(d.push_head_all_reversed(items.iter().copied()), expected);
                r = v.iter().copied().collect();
            }
            Op::Replace(items) => {
                v.clear();
                limit = config.capacity.limit();
                let expected = items
                    .iter()
                    .rev()
                    .try_for_each(|&i| push(&mut v, limit, preemption, true, i).map(drop));
                assert_eq!(d.replace(items.iter().copied()), expected);
                r = v.iter().copied().collect();
            }
            Op::Shrink => {
                let shrunk = limit.and_then(|l| config.rescale.shrunk(l, v.len()));
                assert_eq!(d.shrink(), shrunk.is_some());
                limit = shrunk.or(limit);
                if let Some(l) = limit {
                    r.rescale_to(l);
                }
            }
        }
        assert_eq!(d.capacity().limit(), limit);
    }
}
