//! Ownership of both engine pools and the fill logic shared by startup and the
//! replenisher.

use crate::config::PoolSettings;
use crate::engine::{EngineFactory, EngineMode};
use crate::error::{CipherError, CipherErrorExt};
use crate::pool::EnginePool;
use tracing::{debug, error, info};

/// Result of filling one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The pool was already at capacity; no key was derived.
    Full,
    /// This many engines were appended.
    Added(usize),
    /// The fill failed and was logged.
    Failed,
}

/// Per-mode outcome of one replenishment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplenishReport {
    pub encrypt: FillOutcome,
    pub decrypt: FillOutcome,
}

impl ReplenishReport {
    #[must_use]
    pub const fn outcome(&self, mode: EngineMode) -> FillOutcome {
        match mode {
            EngineMode::Encrypt => self.encrypt,
            EngineMode::Decrypt => self.decrypt,
        }
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        matches!(self.encrypt, FillOutcome::Failed) || matches!(self.decrypt, FillOutcome::Failed)
    }
}

/// Owns the encrypt and decrypt pools together with the settings they are
/// filled from.
#[derive(Debug)]
pub struct PoolManager {
    settings: PoolSettings,
    encrypt: EnginePool,
    decrypt: EnginePool,
}

impl PoolManager {
    /// Creates a manager with two empty pools.
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidConfiguration`] if `settings` fail validation.
    pub fn new(settings: PoolSettings) -> Result<Self, CipherError> {
        settings.validate()?;

        Ok(Self {
            settings,
            encrypt: EnginePool::new(EngineMode::Encrypt),
            decrypt: EnginePool::new(EngineMode::Decrypt),
        })
    }

    #[must_use]
    pub const fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Target capacity of each pool.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.settings.pool_size
    }

    #[must_use]
    pub const fn pool(&self, mode: EngineMode) -> &EnginePool {
        match mode {
            EngineMode::Encrypt => &self.encrypt,
            EngineMode::Decrypt => &self.decrypt,
        }
    }

    /// Tops up the pool for `mode`, deriving a fresh key only when it is short.
    ///
    /// # Errors
    /// Returns [`CipherError::KeyDerivation`] or [`CipherError::EngineInit`] if
    /// the key or an engine cannot be built.
    pub fn fill(&self, mode: EngineMode) -> Result<FillOutcome, CipherError> {
        let pool = self.pool(mode);
        let target = self.target();

        if pool.deficit(target) == 0 {
            debug!(%mode, target, "Pool already at capacity");
            return Ok(FillOutcome::Full);
        }

        let factory = EngineFactory::derive(&self.settings)?;
        let added = pool.fill_to(target, &factory).context(mode.as_str())?;

        Ok(if added == 0 { FillOutcome::Full } else { FillOutcome::Added(added) })
    }

    /// Fills both pools, stopping at the first failure.
    ///
    /// # Errors
    /// See [`PoolManager::fill`].
    pub fn fill_all(&self) -> Result<ReplenishReport, CipherError> {
        let encrypt = self.fill(EngineMode::Encrypt)?;
        let decrypt = self.fill(EngineMode::Decrypt)?;
        info!(target_size = self.target(), "Engine pools filled");

        Ok(ReplenishReport { encrypt, decrypt })
    }

    /// Runs one replenishment pass over both pools.
    ///
    /// A pool whose size differs from the target is filled. Failures are logged
    /// and reported as [`FillOutcome::Failed`]; the other pool is still attempted.
    pub fn replenish(&self) -> ReplenishReport {
        let attempt = |mode: EngineMode| {
            if self.pool(mode).len() == self.target() {
                return FillOutcome::Full;
            }

            self.fill(mode).unwrap_or_else(|e| {
                error!(%mode, error = %e, "Failed to replenish engine pool");
                FillOutcome::Failed
            })
        };

        let report = ReplenishReport {
            encrypt: attempt(EngineMode::Encrypt),
            decrypt: attempt(EngineMode::Decrypt),
        };
        debug!(?report, "Replenishment pass finished");
        report
    }
}
