#![allow(dead_code)]

use cpool_cipher::prelude::*;
use std::time::Duration;

/// Low iteration count so fills stay cheap in debug builds.
pub const FAST_ITERATIONS: u32 = 1_000;

#[must_use]
pub fn fast_settings(pool_size: usize) -> PoolSettings {
    PoolSettings::default().with_pool_size(pool_size).with_iterations(FAST_ITERATIONS)
}

/// Builds a service without the background replenisher.
/// # Panics
/// * If the initial fills fail.
#[must_use]
pub fn manual_service(pool_size: usize) -> CipherService {
    CipherService::builder()
        .settings(fast_settings(pool_size))
        .replenish(false)
        .initialize()
        .expect("Service setup failed")
}

/// Builds a service that replenishes every `interval`. Needs a Tokio runtime.
/// # Panics
/// * If the initial fills fail or no runtime is available.
#[must_use]
pub fn replenishing_service(pool_size: usize, interval: Duration) -> CipherService {
    CipherService::initialize(fast_settings(pool_size).with_replenish_interval(interval))
        .expect("Service setup failed")
}
