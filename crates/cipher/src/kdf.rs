//! PBKDF2-HMAC-SHA256 key derivation.

use crate::error::CipherError;
use hmac::Hmac;
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Largest key this module agrees to derive.
pub const MAX_KEY_LENGTH_BITS: usize = 4096;

/// Secret key material produced by [`derive`]. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: Vec<u8>,
}

impl DerivedKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn len_bits(&self) -> usize {
        self.bytes.len() * 8
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for DerivedKey {}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey").field("bits", &self.len_bits()).finish_non_exhaustive()
    }
}

/// Derives a `key_length_bits` long key from `passphrase` and `salt`.
///
/// Deterministic: identical inputs always produce identical keys.
///
/// # Errors
/// Returns [`CipherError::KeyDerivation`] if `iterations` is zero, or if the key
/// length is zero, not a whole number of bytes, or above [`MAX_KEY_LENGTH_BITS`].
pub fn derive(
    passphrase: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
    iterations: u32,
    key_length_bits: usize,
) -> Result<DerivedKey, CipherError> {
    if iterations == 0 {
        return Err(CipherError::KeyDerivation {
            message: "iteration count must be greater than zero".into(),
            context: None,
        });
    }

    if key_length_bits == 0 || key_length_bits % 8 != 0 || key_length_bits > MAX_KEY_LENGTH_BITS {
        return Err(CipherError::KeyDerivation {
            message: format!(
                "invalid key length {key_length_bits} bits, expected a multiple of 8 in 8..={MAX_KEY_LENGTH_BITS}"
            )
            .into(),
            context: None,
        });
    }

    let mut key = DerivedKey { bytes: vec![0u8; key_length_bits / 8] };
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase.as_ref(), salt.as_ref(), iterations, &mut key.bytes)
        .map_err(|e| CipherError::KeyDerivation {
            message: format!("PBKDF2 rejected its parameters: {e}").into(),
            context: None,
        })?;

    Ok(key)
}
