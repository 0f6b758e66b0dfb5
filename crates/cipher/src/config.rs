//! Pool settings and their fixed defaults.

use crate::error::CipherError;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Target number of ready engines per mode.
pub const DEFAULT_POOL_SIZE: usize = 10;
pub const DEFAULT_PASSPHRASE: &str = "mySecret";
pub const DEFAULT_SALT: &str = "salt";
/// PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 65_536;
pub const DEFAULT_KEY_LENGTH_BITS: usize = 256;
pub const DEFAULT_REPLENISH_INTERVAL: Duration = Duration::from_secs(60);

/// Settings consumed by the pool manager.
///
/// `Default` yields the fixed production constants. Only the pool size and the
/// replenish interval are read from external settings; key material always comes
/// from the defaults unless set in-process through the `with_*` methods.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub pool_size: usize,
    #[serde(skip)]
    pub passphrase: String,
    #[serde(skip)]
    pub salt: String,
    #[serde(skip)]
    pub iterations: u32,
    #[serde(skip)]
    pub key_length_bits: usize,
    pub replenish_interval_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            passphrase: DEFAULT_PASSPHRASE.to_owned(),
            salt: DEFAULT_SALT.to_owned(),
            iterations: DEFAULT_ITERATIONS,
            key_length_bits: DEFAULT_KEY_LENGTH_BITS,
            replenish_interval_ms: u64::try_from(DEFAULT_REPLENISH_INTERVAL.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl fmt::Debug for PoolSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolSettings")
            .field("pool_size", &self.pool_size)
            .field("passphrase", &"<redacted>")
            .field("salt", &self.salt)
            .field("iterations", &self.iterations)
            .field("key_length_bits", &self.key_length_bits)
            .field("replenish_interval_ms", &self.replenish_interval_ms)
            .finish()
    }
}

impl PoolSettings {
    #[must_use]
    pub const fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub const fn with_key_length_bits(mut self, bits: usize) -> Self {
        self.key_length_bits = bits;
        self
    }

    /// Sets the replenish interval, truncated to whole milliseconds.
    #[must_use]
    pub fn with_replenish_interval(mut self, interval: Duration) -> Self {
        self.replenish_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub const fn replenish_interval(&self) -> Duration {
        Duration::from_millis(self.replenish_interval_ms)
    }

    /// Checks the pool-level settings.
    ///
    /// Key derivation parameters are validated by the derivation itself so that
    /// they surface as [`CipherError::KeyDerivation`].
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidConfiguration`] for a zero pool size or a zero
    /// replenish interval.
    pub fn validate(&self) -> Result<(), CipherError> {
        if self.pool_size == 0 {
            return Err(CipherError::InvalidConfiguration {
                message: "pool_size must be greater than zero".into(),
                context: None,
            });
        }

        if self.replenish_interval_ms == 0 {
            return Err(CipherError::InvalidConfiguration {
                message: "replenish_interval_ms must be greater than zero".into(),
                context: None,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let settings = PoolSettings::default();
        assert_eq!(settings.pool_size, 10);
        assert_eq!(settings.passphrase, "mySecret");
        assert_eq!(settings.salt, "salt");
        assert_eq!(settings.iterations, 65_536);
        assert_eq!(settings.key_length_bits, 256);
        assert_eq!(settings.replenish_interval(), Duration::from_secs(60));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings: PoolSettings =
            serde_json::from_str(r#"{ "pool_size": 3, "replenish_interval_ms": 250 }"#)
                .expect("settings deserialize");

        assert_eq!(settings.pool_size, 3);
        assert_eq!(settings.replenish_interval(), Duration::from_millis(250));
        assert_eq!(settings.iterations, DEFAULT_ITERATIONS);
        assert_eq!(settings.passphrase, DEFAULT_PASSPHRASE);
    }

    #[test]
    fn test_key_material_is_not_deserialized() {
        let settings: PoolSettings = serde_json::from_str(
            r#"{ "passphrase": "007", "salt": "pepper", "iterations": 1, "key_length_bits": 128 }"#,
        )
        .expect("unknown and skipped fields are ignored");

        assert_eq!(settings, PoolSettings::default());
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let err = PoolSettings::default().with_pool_size(0).validate().expect_err("zero size");
        assert!(matches!(err, CipherError::InvalidConfiguration { .. }));

        let err = PoolSettings::default()
            .with_replenish_interval(Duration::ZERO)
            .validate()
            .expect_err("zero interval");
        assert!(matches!(err, CipherError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_debug_redacts_passphrase() {
        let rendered = format!("{:?}", PoolSettings::default().with_passphrase("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
