//! The encrypt/decrypt façade over the pool manager.

use crate::config::PoolSettings;
use crate::engine::{CipherEngine, EngineMode};
use crate::error::{CipherError, CipherErrorExt, TransformStage};
use crate::manager::{PoolManager, ReplenishReport};
use crate::replenisher::{Replenisher, ReplenisherHandle};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use tracing::{info, warn};

/// Configures and starts a [`CipherService`].
#[derive(Debug)]
pub struct CipherServiceBuilder {
    settings: PoolSettings,
    replenish: bool,
}

impl CipherServiceBuilder {
    #[must_use]
    pub fn settings(mut self, settings: PoolSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Enables or disables the background replenisher. Enabled by default.
    ///
    /// Without it the service does not need a Tokio runtime and capacity only
    /// returns through [`CipherService::replenish_now`].
    #[must_use]
    pub const fn replenish(mut self, enabled: bool) -> Self {
        self.replenish = enabled;
        self
    }

    /// Validates the settings, fills both pools and starts the replenisher.
    ///
    /// The initial fills run synchronously on the calling thread.
    ///
    /// # Errors
    /// * [`CipherError::InvalidConfiguration`] for invalid settings.
    /// * [`CipherError::KeyDerivation`] / [`CipherError::EngineInit`] if the initial
    ///   fills fail.
    /// * [`CipherError::Scheduler`] if the replenisher is enabled outside of a
    ///   Tokio runtime.
    pub fn initialize(self) -> Result<CipherService, CipherError> {
        let interval = self.settings.replenish_interval();
        let manager = Arc::new(PoolManager::new(self.settings)?);
        manager.fill_all().context("Initial pool fill")?;

        let replenisher = if self.replenish {
            Some(Replenisher::new(Arc::clone(&manager), interval).spawn()?)
        } else {
            None
        };

        info!(
            pool_size = manager.target(),
            replenishing = replenisher.is_some(),
            "Cipher service initialized"
        );

        Ok(CipherService { manager, replenisher })
    }
}

/// Encrypts and decrypts strings with pooled single-use engines.
///
/// Each call checks out exactly one engine and consumes it. Calls never wait for
/// capacity: an empty pool fails fast with [`CipherError::PoolExhausted`].
#[derive(Debug)]
pub struct CipherService {
    manager: Arc<PoolManager>,
    replenisher: Option<ReplenisherHandle>,
}

impl CipherService {
    #[must_use]
    pub fn builder() -> CipherServiceBuilder {
        CipherServiceBuilder { settings: PoolSettings::default(), replenish: true }
    }

    /// Starts a service with the background replenisher on the current runtime.
    ///
    /// # Errors
    /// See [`CipherServiceBuilder::initialize`].
    pub fn initialize(settings: PoolSettings) -> Result<Self, CipherError> {
        Self::builder().settings(settings).initialize()
    }

    /// Encrypts the UTF-8 bytes of `value` and returns standard padded base64.
    ///
    /// # Errors
    /// Returns [`CipherError::PoolExhausted`] if no encrypt engine is ready.
    pub fn encrypt(&self, value: &str) -> Result<String, CipherError> {
        let engine = self.checkout(EngineMode::Encrypt)?;
        let ciphertext = engine.transform(value.as_bytes())?;

        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypts a base64 ciphertext produced by [`CipherService::encrypt`].
    ///
    /// The engine is checked out before the input is looked at and is consumed
    /// whatever the outcome.
    ///
    /// # Errors
    /// * [`CipherError::PoolExhausted`] if no decrypt engine is ready.
    /// * [`CipherError::Transform`] tagged with the failing stage.
    pub fn decrypt(&self, value: &str) -> Result<String, CipherError> {
        let engine = self.checkout(EngineMode::Decrypt)?;

        let ciphertext = STANDARD.decode(value).map_err(|e| {
            CipherError::transform(TransformStage::Decode, format!("invalid base64: {e}"))
        })?;
        let plaintext = engine.transform(&ciphertext)?;

        String::from_utf8(plaintext).map_err(|e| {
            CipherError::transform(TransformStage::Utf8, format!("plaintext is not UTF-8: {e}"))
        })
    }

    /// Current number of ready engines for `mode`.
    #[must_use]
    pub fn available(&self, mode: EngineMode) -> usize {
        self.manager.pool(mode).len()
    }

    #[must_use]
    pub const fn manager(&self) -> &Arc<PoolManager> {
        &self.manager
    }

    /// Runs one replenishment pass on the calling thread.
    pub fn replenish_now(&self) -> ReplenishReport {
        self.manager.replenish()
    }

    #[must_use]
    pub fn is_replenishing(&self) -> bool {
        self.replenisher.as_ref().is_some_and(ReplenisherHandle::is_running)
    }

    /// Signals the replenisher to stop. Ready engines stay usable.
    pub fn stop(&self) {
        if let Some(replenisher) = &self.replenisher {
            replenisher.stop();
        }
    }

    /// Stops the replenisher and waits for it to finish.
    ///
    /// # Errors
    /// Returns [`CipherError::Internal`] if the replenisher task failed.
    pub async fn shutdown(mut self) -> Result<(), CipherError> {
        if let Some(mut replenisher) = self.replenisher.take() {
            replenisher.stop();
            replenisher.join().await?;
        }

        info!("Cipher service shut down");
        Ok(())
    }

    fn checkout(&self, mode: EngineMode) -> Result<CipherEngine, CipherError> {
        self.manager.pool(mode).checkout().ok_or_else(|| {
            warn!(%mode, "Engine pool exhausted");
            CipherError::PoolExhausted { mode, context: None }
        })
    }
}
