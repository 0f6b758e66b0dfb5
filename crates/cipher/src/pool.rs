//! Bounded pool of ready engines for one mode.

use crate::engine::{CipherEngine, EngineFactory, EngineMode};
use crate::error::CipherError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Ready engines of a single [`EngineMode`].
///
/// Engines leave the pool through [`EnginePool::checkout`] and never come back.
/// The lock guards only the push/pop; engines are built outside of it.
#[derive(Debug)]
pub struct EnginePool {
    mode: EngineMode,
    engines: Mutex<Vec<CipherEngine>>,
    constructed: AtomicU64,
    checked_out: AtomicU64,
}

impl EnginePool {
    #[must_use]
    pub fn new(mode: EngineMode) -> Self {
        Self {
            mode,
            engines: Mutex::new(Vec::new()),
            constructed: AtomicU64::new(0),
            checked_out: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> EngineMode {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.lock().is_empty()
    }

    /// Number of engines missing to reach `target`, floored at zero.
    #[must_use]
    pub fn deficit(&self, target: usize) -> usize {
        target.saturating_sub(self.len())
    }

    /// Total engines ever built for this pool.
    #[must_use]
    pub fn constructed(&self) -> u64 {
        self.constructed.load(Ordering::Relaxed)
    }

    /// Total successful checkouts.
    #[must_use]
    pub fn checked_out(&self) -> u64 {
        self.checked_out.load(Ordering::Relaxed)
    }

    /// Tops the pool up to `target` engines and returns how many were added.
    ///
    /// Only ever adds. Concurrent checkouts may run during the fill, and the cap
    /// is re-checked under the lock for every append, so concurrent fills never
    /// push the pool above `target`. An engine built for a slot that was taken
    /// in the meantime is dropped.
    ///
    /// # Errors
    /// Propagates the first factory failure. Engines appended before it remain.
    pub fn fill_to(&self, target: usize, factory: &EngineFactory) -> Result<usize, CipherError> {
        let deficit = self.deficit(target);
        let mut added = 0;

        for _ in 0..deficit {
            let engine = factory.create(self.mode)?;
            self.constructed.fetch_add(1, Ordering::Relaxed);

            let mut engines = self.engines.lock();
            if engines.len() >= target {
                trace!(mode = %self.mode, id = %engine.id(), "Pool reached target, discarding engine");
                break;
            }
            engines.push(engine);
            added += 1;
        }

        debug!(mode = %self.mode, added, target, "Pool filled");
        Ok(added)
    }

    /// Removes and returns one engine, or `None` if the pool is empty.
    ///
    /// Never waits for a replenishment.
    pub fn checkout(&self) -> Option<CipherEngine> {
        let engine = self.engines.lock().pop()?;
        self.checked_out.fetch_add(1, Ordering::Relaxed);
        trace!(mode = %self.mode, id = %engine.id(), "Engine checked out");
        Some(engine)
    }
}
