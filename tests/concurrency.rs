use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    thread,
};

use bounded_deque::{BoundedDeque, DequeConfig, DequeError};

const THREADS: usize = 8;
const PUSHES: usize = 2_000;
const LIMIT: usize = 100;

#[test]
fn concurrent_pushes_never_exceed_the_limit() {
    let deque = BoundedDeque::new(DequeConfig::bounded(LIMIT));
    let accepted = AtomicUsize::new(0);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let observer = s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                assert!(deque.len() <= LIMIT);
                assert!(deque.values().len() <= LIMIT);
            }
        });

        let producers: Vec<_> = (0..THREADS)
            .map(|t| {
                let (deque, accepted) = (&deque, &accepted);
                s.spawn(move || {
                    for i in 0..PUSHES {
                        match deque.push_tail(t * PUSHES + i) {
                            Ok(None) => {
                                accepted.fetch_add(1, Ordering::Relaxed);
                            }
                            Ok(Some(_)) => panic!("non-preempting deque evicted"),
                            Err(err) => assert_eq!(err, DequeError::Full),
                        }
                    }
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        observer.join().unwrap();
    });

    assert_eq!(accepted.load(Ordering::Relaxed), LIMIT);
    assert_eq!(deque.len(), LIMIT);
}

#[test]
fn concurrent_preempting_pushes_hold_the_ceiling() {
    let deque = BoundedDeque::new(DequeConfig::bounded(LIMIT).with_preemption(true));
    let evicted = AtomicUsize::new(0);

    thread::scope(|s| {
        for t in 0..THREADS {
            let (deque, evicted) = (&deque, &evicted);
            s.spawn(move || {
                for i in 0..PUSHES {
                    let item = t * PUSHES + i;
                    let pushed =
                        if i % 2 == 0 { deque.push_head(item) } else { deque.push_tail(item) };
                    if pushed.unwrap().is_some() {
                        evicted.fetch_add(1, Ordering::Relaxed);
                    }
                    assert!(deque.len() <= LIMIT);
                }
            });
        }
    });

    assert_eq!(deque.len(), LIMIT);
    assert_eq!(evicted.load(Ordering::Relaxed), THREADS * PUSHES - LIMIT);
}

#[test]
fn producers_and_consumers_conserve_elements() {
    let deque = BoundedDeque::new(DequeConfig::bounded(16));
    let pushed = AtomicUsize::new(0);
    let popped = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..THREADS / 2 {
            s.spawn(|| {
                for i in 0..PUSHES {
                    if deque.push_tail(i).is_ok() {
                        pushed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
            s.spawn(|| {
                for _ in 0..PUSHES {
                    if deque.pop_head().is_ok() {
                        popped.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
        s.spawn(|| {
            for _ in 0..PUSHES / 10 {
                deque.expand();
                deque.shrink();
            }
        });
    });

    assert_eq!(pushed.load(Ordering::Relaxed) - popped.load(Ordering::Relaxed), deque.len());
    assert!(deque.len() <= deque.capacity().limit().unwrap());
}
