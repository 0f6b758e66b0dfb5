//! # Cipher Errors
//!
//! [`CipherError`] covers every failure of the pool: key derivation and engine
//! construction (raised by fills), exhaustion and transform failures (raised per
//! call), and startup problems.

use crate::engine::EngineMode;
use std::borrow::Cow;
use std::fmt;

/// The step of a transform that rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformStage {
    /// The ciphertext was not valid base64.
    Decode,
    /// The block cipher rejected the data (alignment or padding).
    Cipher,
    /// The decrypted bytes were not valid UTF-8.
    Utf8,
}

impl fmt::Display for TransformStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Decode => "decode",
            Self::Cipher => "cipher",
            Self::Utf8 => "utf8",
        })
    }
}

#[cpool_derive::cpool_error]
pub enum CipherError {
    /// Key derivation parameters were rejected.
    ///
    /// Fatal during startup; logged and retried on the next tick during replenishment.
    #[error("Key derivation error{}: {message}", format_context(.context))]
    KeyDerivation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An engine could not be built from the derived key.
    #[error("Engine initialization error{}: {message}", format_context(.context))]
    EngineInit { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Checkout found the pool empty. Capacity returns with the next replenishment.
    #[error("Pool exhausted{}: no {mode} engine available", format_context(.context))]
    PoolExhausted { mode: EngineMode, context: Option<Cow<'static, str>> },

    /// The input was rejected while transforming. The engine is consumed regardless.
    #[error("Transform error at {stage} stage{}: {message}", format_context(.context))]
    Transform {
        stage: TransformStage,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// Pool settings failed validation.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The replenisher could not be scheduled.
    #[error("Scheduler error{}: {message}", format_context(.context))]
    Scheduler { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected failures.
    #[error("Internal cipher pool error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CipherError {
    pub(crate) fn transform(stage: TransformStage, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Transform { stage, message: message.into(), context: None }
    }

    /// Returns `true` if the call may succeed after the next replenishment.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. })
    }
}
