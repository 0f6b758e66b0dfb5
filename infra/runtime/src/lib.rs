//! # Runtime
//!
//! Tokio runtime presets shared by the workspace binaries.
//!
//! The cipher pool performs CPU-bound work (key derivation, engine construction) on
//! the blocking thread pool, so presets tune both the async worker count and the
//! blocking pool size.
//!
//! ## Presets
//! * **Service**: one async worker per core, generous blocking pool.
//! * **Compact**: two async workers, small blocking pool. Suited to CLI tools.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[cpool_runtime::main(compact)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use cpool_derive::main;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Fallback worker count if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
/// Upper bound for both the async and blocking pools.
const MAX_THREADS: usize = 512;
/// How long an idle blocking thread stays alive.
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

/// Detects the worker count from `TOKIO_WORKER_THREADS` or the hardware.
fn detect_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= MAX_THREADS)
            .unwrap_or_else(|| {
                available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub max_blocking_threads: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::service()
    }
}

impl RuntimeConfig {
    /// Preset for long-running services.
    #[must_use]
    pub fn service() -> Self {
        Self {
            worker_threads: detect_worker_threads(),
            max_blocking_threads: 64,
            thread_name: "cpool-worker".to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }

    /// Preset for command-line tools and tests.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            worker_threads: detect_worker_threads().min(2),
            max_blocking_threads: 4,
            thread_name: "cpool-cli".to_owned(),
            thread_keep_alive: Duration::from_secs(10),
        }
    }

    #[must_use = "Customize the number of async worker threads"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_THREADS);
        self
    }

    #[must_use = "Customize the size of the blocking thread pool"]
    pub fn with_max_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = threads.clamp(1, MAX_THREADS);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name = if name.trim().is_empty() { "cpool-worker".to_owned() } else { name };
        self
    }

    fn normalized(&self) -> Self {
        self.clone()
            .with_worker_threads(self.worker_threads)
            .with_max_blocking_threads(self.max_blocking_threads)
            .with_thread_name(self.thread_name.clone())
    }
}

/// Builds a multithreaded Tokio runtime from `config`.
///
/// Out-of-range thread counts are clamped and an empty thread name falls back to
/// the preset default.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the OS refuses to create the runtime threads.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .max_blocking_threads(config.max_blocking_threads)
        .thread_name(&config.thread_name)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}
