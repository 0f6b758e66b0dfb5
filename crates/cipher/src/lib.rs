//! # Cipher Pool
//!
//! A symmetric encrypt/decrypt service backed by pools of pre-initialized
//! AES-256-CBC engines.
//!
//! ## Overview
//!
//! Building a cipher engine requires a PBKDF2 key derivation, which is far more
//! expensive than the transform itself. [`CipherService`] keeps one pool of ready
//! engines per direction, hands out exactly one engine per call and never takes
//! it back. A background [`Replenisher`] tops both pools up to capacity at a
//! fixed interval.
//!
//! ## Features
//!
//! * **Single-use engines**: transforming consumes the engine, enforced by the type system.
//! * **Fail fast**: an empty pool returns [`CipherError::PoolExhausted`] instead of waiting.
//! * **Bounded**: concurrent fills never push a pool above its target size.
//! * **Self-healing**: replenishment failures are logged and retried on the next tick.
//!
//! ## Security note
//!
//! Every engine uses the same derived key and the same all-zero IV, so equal
//! plaintexts always produce equal ciphertexts and there is no authentication.
//! This keeps output compatible with existing ciphertexts; do not use it where
//! confidentiality against an active attacker matters.
//!
//! # Example
//!
//! ```rust
//! use cpool_cipher::{CipherError, CipherService, PoolSettings};
//!
//! fn main() -> Result<(), CipherError> {
//!     let settings = PoolSettings::default().with_pool_size(2).with_iterations(1_000);
//!     let service = CipherService::builder().settings(settings).replenish(false).initialize()?;
//!
//!     let ciphertext = service.encrypt("hello")?;
//!     assert_eq!(service.decrypt(&ciphertext)?, "hello");
//!     Ok(())
//! }
//! ```

mod config;
mod engine;
mod error;
mod kdf;
mod manager;
mod pool;
mod replenisher;
mod service;

pub use config::{
    DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH_BITS, DEFAULT_PASSPHRASE, DEFAULT_POOL_SIZE,
    DEFAULT_REPLENISH_INTERVAL, DEFAULT_SALT, PoolSettings,
};
pub use engine::{
    BLOCK_LEN, CipherEngine, EngineFactory, EngineId, EngineMode, INITIALIZATION_VECTOR,
    InitializationVector, KEY_LEN,
};
pub use error::{CipherError, CipherErrorExt, TransformStage};
pub use kdf::{DerivedKey, MAX_KEY_LENGTH_BITS, derive};
pub use manager::{FillOutcome, PoolManager, ReplenishReport};
pub use pool::EnginePool;
pub use replenisher::{Replenisher, ReplenisherHandle};
pub use service::{CipherService, CipherServiceBuilder};

pub mod prelude {
    pub use crate::{CipherError, CipherErrorExt, CipherService, EngineMode, PoolSettings};
}
