//! # Cipher Pool CLI
//!
//! Drives [`cpool_cipher::CipherService`] from the command line. Settings come from
//! an optional file plus `CPOOL__*` environment overrides.

pub mod args;
pub mod commands;
pub mod config;

pub use crate::args::{Cli, Command, LogRotation};
pub use crate::commands::{BurstSummary, execute};
pub use crate::config::{ConfigError, load_settings};

use anyhow::{Context, Result};
use cpool_cipher::{CipherService, PoolSettings};
use std::io::Write;

/// Starts the service, runs `command` and shuts the service down.
///
/// The initial fills derive keys, so they run on the blocking pool.
///
/// # Errors
/// Returns startup, command and shutdown failures.
pub async fn run(settings: PoolSettings, command: Command, out: &mut impl Write) -> Result<()> {
    let service = tokio::task::spawn_blocking(move || CipherService::initialize(settings))
        .await
        .context("Startup task failed")?
        .context("Failed to start the cipher service")?;

    let result = execute(&service, command, out);
    service.shutdown().await.context("Failed to stop the cipher service")?;
    result
}
