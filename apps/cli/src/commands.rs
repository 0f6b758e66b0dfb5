use crate::args::Command;
use anyhow::{Context, Result, ensure};
use cpool_cipher::{CipherError, CipherService};
use std::io::Write;
use tracing::debug;

/// Outcome of a `burst` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurstSummary {
    pub calls: usize,
    pub succeeded: usize,
    pub exhausted: usize,
}

/// Executes `command` against `service`, writing results to `out`.
///
/// # Errors
/// Returns the first service failure, a round-trip mismatch or an output error.
pub fn execute(service: &CipherService, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Roundtrip { values } => {
            for value in &values {
                let ciphertext = roundtrip(service, value)?;
                writeln!(out, "{ciphertext}")?;
            }
        },
        Command::Encrypt { value } => {
            writeln!(out, "{}", service.encrypt(&value).context("Encryption failed")?)?;
        },
        Command::Decrypt { value } => {
            writeln!(out, "{}", service.decrypt(&value).context("Decryption failed")?)?;
        },
        Command::Burst { calls } => {
            let summary = burst(service, calls)?;
            writeln!(
                out,
                "calls={} succeeded={} exhausted={}",
                summary.calls, summary.succeeded, summary.exhausted
            )?;
        },
    }

    Ok(())
}

/// Encrypts `value`, decrypts the result and checks both sides agree.
///
/// # Errors
/// Fails if either transform fails or the decrypted value differs.
pub fn roundtrip(service: &CipherService, value: &str) -> Result<String> {
    let ciphertext = service.encrypt(value).with_context(|| format!("Encrypting '{value}'"))?;
    let plaintext = service.decrypt(&ciphertext).with_context(|| format!("Decrypting '{value}'"))?;
    ensure!(plaintext == value, "Round trip mismatch: '{value}' came back as '{plaintext}'");

    debug!(%ciphertext, "Round trip verified");
    Ok(ciphertext)
}

/// Issues `calls` encrypt calls without waiting for replenishment.
///
/// # Errors
/// Fails on any error other than pool exhaustion.
pub fn burst(service: &CipherService, calls: usize) -> Result<BurstSummary, CipherError> {
    let mut summary = BurstSummary { calls, ..BurstSummary::default() };

    for i in 0..calls {
        match service.encrypt(&format!("burst-{i}")) {
            Ok(_) => summary.succeeded += 1,
            Err(e) if e.is_exhausted() => summary.exhausted += 1,
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpool_cipher::PoolSettings;

    fn service(pool_size: usize) -> CipherService {
        let settings = PoolSettings::default().with_pool_size(pool_size).with_iterations(100);
        CipherService::builder().settings(settings).replenish(false).initialize().unwrap()
    }

    fn run(service: &CipherService, command: Command) -> Result<String> {
        let mut out = Vec::new();
        execute(service, command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_roundtrip_prints_one_line_per_value() {
        let service = service(3);
        let output =
            run(&service, Command::Roundtrip { values: vec!["a".into(), "b".into()] }).unwrap();
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_encrypt_then_decrypt_commands() {
        let service = service(1);
        let ciphertext = run(&service, Command::Encrypt { value: "hi".into() }).unwrap();
        let plaintext =
            run(&service, Command::Decrypt { value: ciphertext.trim().to_owned() }).unwrap();
        assert_eq!(plaintext, "hi\n");
    }

    #[test]
    fn test_burst_counts_exhaustion() {
        let service = service(4);
        let summary = burst(&service, 10).unwrap();
        assert_eq!(summary, BurstSummary { calls: 10, succeeded: 4, exhausted: 6 });
    }

    #[test]
    fn test_roundtrip_surfaces_exhaustion() {
        let service = service(1);
        let err = run(&service, Command::Roundtrip { values: vec!["a".into(), "b".into()] })
            .unwrap_err();
        let cipher = err.downcast_ref::<CipherError>().expect("cipher error");
        assert!(cipher.is_exhausted());
    }
}
