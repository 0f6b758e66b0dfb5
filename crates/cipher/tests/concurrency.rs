pub mod fixtures;

use cpool_cipher::prelude::*;
use cpool_cipher::{EngineFactory, EnginePool};
use fixtures::*;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const POOL_SIZE: usize = 8;
const CALLERS: usize = 32;

#[test]
fn test_concurrent_encrypts_get_exactly_pool_size_successes() {
    let service = Arc::new(manual_service(POOL_SIZE));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service.encrypt(&format!("caller-{i}"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().expect("Caller panicked")).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let exhausted = results.iter().filter(|r| matches!(r, Err(e) if e.is_exhausted())).count();

    assert_eq!(successes, POOL_SIZE);
    assert_eq!(exhausted, CALLERS - POOL_SIZE);
    assert_eq!(service.available(EngineMode::Encrypt), 0);
}

#[test]
fn test_no_engine_is_checked_out_twice() {
    let settings = fast_settings(POOL_SIZE);
    let pool = Arc::new(EnginePool::new(EngineMode::Decrypt));
    let factory = EngineFactory::derive(&settings).unwrap();
    pool.fill_to(POOL_SIZE, &factory).unwrap();

    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                pool.checkout().map(|engine| engine.id())
            })
        })
        .collect();

    let ids: Vec<_> =
        handles.into_iter().filter_map(|h| h.join().expect("Caller panicked")).collect();
    let unique: HashSet<_> = ids.iter().copied().collect();

    assert_eq!(ids.len(), POOL_SIZE);
    assert_eq!(unique.len(), POOL_SIZE);
    assert_eq!(pool.checked_out(), POOL_SIZE as u64);
}

#[test]
fn test_fills_racing_checkouts_stay_bounded() {
    let settings = fast_settings(POOL_SIZE);
    let pool = Arc::new(EnginePool::new(EngineMode::Encrypt));
    let factory = Arc::new(EngineFactory::derive(&settings).unwrap());
    let barrier = Arc::new(Barrier::new(8));

    let fillers: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let factory = Arc::clone(&factory);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..20 {
                    pool.fill_to(POOL_SIZE, &factory).unwrap();
                    assert!(pool.len() <= POOL_SIZE);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..50).filter_map(|_| pool.checkout()).map(|e| e.id()).collect::<Vec<_>>()
            })
        })
        .collect();

    for filler in fillers {
        filler.join().expect("Filler panicked");
    }
    let mut ids: Vec<_> =
        consumers.into_iter().flat_map(|h| h.join().expect("Consumer panicked")).collect();
    ids.extend(std::iter::from_fn(|| pool.checkout()).map(|e| e.id()));

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(pool.checked_out(), ids.len() as u64);
    assert!(pool.constructed() >= pool.checked_out());
}
