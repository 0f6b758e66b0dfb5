//! Single-use AES-256-CBC engines and the factory that builds them.
//!
//! An engine is keyed and bound to the fixed IV at construction time. Transforming
//! consumes the engine, so a checked-out engine can never serve a second message.

use crate::config::PoolSettings;
use crate::error::{CipherError, CipherErrorExt, TransformStage};
use crate::kdf::{self, DerivedKey};
use aes::Aes256;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// AES block and IV length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Key length required by AES-256, in bytes.
pub const KEY_LEN: usize = 32;

/// The all-zero IV shared by every engine.
pub const INITIALIZATION_VECTOR: InitializationVector = InitializationVector([0u8; BLOCK_LEN]);

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// Initialization vector for CBC mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InitializationVector([u8; BLOCK_LEN]);

impl InitializationVector {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BLOCK_LEN] {
        &self.0
    }
}

/// Direction an engine is keyed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineMode {
    Encrypt,
    Decrypt,
}

impl EngineMode {
    pub const ALL: [Self; 2] = [Self::Encrypt, Self::Decrypt];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-unique engine identifier, useful to prove exclusive checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(u64);

impl EngineId {
    fn next() -> Self {
        Self(NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

enum Keyed {
    Encrypt(Encryptor),
    Decrypt(Decryptor),
}

/// A keyed, ready-to-use cipher engine for exactly one message.
pub struct CipherEngine {
    id: EngineId,
    keyed: Keyed,
}

impl fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherEngine").field("id", &self.id).field("mode", &self.mode()).finish()
    }
}

impl CipherEngine {
    #[must_use]
    pub const fn id(&self) -> EngineId {
        self.id
    }

    #[must_use]
    pub const fn mode(&self) -> EngineMode {
        match self.keyed {
            Keyed::Encrypt(_) => EngineMode::Encrypt,
            Keyed::Decrypt(_) => EngineMode::Decrypt,
        }
    }

    /// Runs `input` through the engine, consuming it.
    ///
    /// Encryption applies PKCS#7 padding and cannot fail. Decryption expects a
    /// non-empty, block-aligned ciphertext with valid padding.
    ///
    /// # Errors
    /// Returns [`CipherError::Transform`] at the [`TransformStage::Cipher`] stage if
    /// the ciphertext is misaligned or its padding is invalid.
    pub fn transform(self, input: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.keyed {
            Keyed::Encrypt(encryptor) => Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(input)),
            Keyed::Decrypt(decryptor) => {
                if input.is_empty() || input.len() % BLOCK_LEN != 0 {
                    return Err(CipherError::transform(
                        TransformStage::Cipher,
                        format!(
                            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
                            input.len()
                        ),
                    ));
                }

                decryptor.decrypt_padded_vec_mut::<Pkcs7>(input).map_err(|_| {
                    CipherError::transform(TransformStage::Cipher, "invalid PKCS#7 padding")
                })
            },
        }
    }
}

/// Builds engines from one derived key and the fixed IV.
#[derive(Debug)]
pub struct EngineFactory {
    key: DerivedKey,
    iv: InitializationVector,
}

impl EngineFactory {
    #[must_use]
    pub fn new(key: DerivedKey, iv: InitializationVector) -> Self {
        Self { key, iv }
    }

    /// Derives the key described by `settings` and binds it to the fixed IV.
    ///
    /// # Errors
    /// Returns [`CipherError::KeyDerivation`] if the derivation parameters are invalid.
    pub fn derive(settings: &PoolSettings) -> Result<Self, CipherError> {
        let key = kdf::derive(
            settings.passphrase.as_bytes(),
            settings.salt.as_bytes(),
            settings.iterations,
            settings.key_length_bits,
        )
        .context("Deriving pool key")?;

        Ok(Self::new(key, INITIALIZATION_VECTOR))
    }

    /// Constructs a new engine for `mode`.
    ///
    /// # Errors
    /// Returns [`CipherError::EngineInit`] if the key is not [`KEY_LEN`] bytes long.
    pub fn create(&self, mode: EngineMode) -> Result<CipherEngine, CipherError> {
        let key = self.key.as_bytes();
        let iv = self.iv.as_bytes().as_slice();

        let keyed = match mode {
            EngineMode::Encrypt => Encryptor::new_from_slices(key, iv).map(Keyed::Encrypt),
            EngineMode::Decrypt => Decryptor::new_from_slices(key, iv).map(Keyed::Decrypt),
        }
        .map_err(|_| CipherError::EngineInit {
            message: format!(
                "key of {} bytes is incompatible with AES-256, expected {KEY_LEN}",
                key.len()
            )
            .into(),
            context: Some(mode.as_str().into()),
        })?;

        Ok(CipherEngine { id: EngineId::next(), keyed })
    }
}
