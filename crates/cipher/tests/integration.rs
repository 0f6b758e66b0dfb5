pub mod fixtures;

use cpool_cipher::prelude::*;
use cpool_cipher::{FillOutcome, TransformStage};
use fixtures::*;

#[test]
fn test_roundtrip() {
    let service = manual_service(4);

    for value in ["hello", "", "Hello, World!", "ünïcödé ✓", "a much longer value spanning several AES blocks"] {
        let ciphertext = service.encrypt(value).expect("Encryption failed");
        assert_eq!(service.decrypt(&ciphertext).expect("Decryption failed"), value);
    }
}

#[test]
fn test_exhaustion_after_pool_size_calls() {
    let service = manual_service(3);

    for i in 0..3 {
        service.encrypt(&format!("value-{i}")).expect("Pool should still have capacity");
    }

    let err = service.encrypt("one too many").unwrap_err();
    assert!(matches!(err, CipherError::PoolExhausted { mode: EngineMode::Encrypt, .. }));
    assert!(err.is_exhausted());
    assert_eq!(service.available(EngineMode::Decrypt), 3);
}

#[test]
fn test_malformed_base64_is_a_decode_error() {
    let service = manual_service(1);
    let err = service.decrypt("not-valid-base64!!").unwrap_err();

    assert!(matches!(err, CipherError::Transform { stage: TransformStage::Decode, .. }));
    assert!(err.to_string().contains("decode"));
}

#[test]
fn test_exhaustion_is_reported_before_input_validation() {
    let service = manual_service(1);
    let _ = service.decrypt("not-valid-base64!!");

    let err = service.decrypt("not-valid-base64!!").unwrap_err();
    assert!(matches!(err, CipherError::PoolExhausted { mode: EngineMode::Decrypt, .. }));
}

#[test]
fn test_known_answer_with_default_settings() {
    let settings = PoolSettings::default().with_pool_size(1);
    let service = CipherService::builder().settings(settings).replenish(false).initialize().unwrap();

    assert_eq!(service.encrypt("hello").unwrap(), "YZt2TU6IChs6ReHQVHLYjw==");
    assert_eq!(service.decrypt("KGyMFg18pn6nR3sSLydaDg==").unwrap(), "Hello, World!");
}

#[test]
fn test_known_answer_for_empty_string() {
    let settings = PoolSettings::default().with_pool_size(1);
    let service = CipherService::builder().settings(settings).replenish(false).initialize().unwrap();

    assert_eq!(service.encrypt("").unwrap(), "hPYayVoJoASGfN8Jbs19Yg==");
    assert_eq!(service.decrypt("hPYayVoJoASGfN8Jbs19Yg==").unwrap(), "");
}

#[test]
fn test_fill_on_full_pool_is_idempotent() {
    let service = manual_service(5);
    let pool = service.manager().pool(EngineMode::Encrypt);
    let constructed = pool.constructed();

    assert_eq!(service.manager().fill(EngineMode::Encrypt).unwrap(), FillOutcome::Full);
    assert_eq!(pool.constructed(), constructed);
    assert_eq!(pool.len(), 5);
}

#[test]
fn test_initialize_rejects_invalid_settings() {
    let err = CipherService::builder()
        .settings(fast_settings(0))
        .replenish(false)
        .initialize()
        .unwrap_err();
    assert!(matches!(err, CipherError::InvalidConfiguration { .. }));

    let err = CipherService::builder()
        .settings(fast_settings(2).with_key_length_bits(255))
        .replenish(false)
        .initialize()
        .unwrap_err();
    assert!(matches!(err, CipherError::KeyDerivation { .. }));

    let err = CipherService::builder()
        .settings(fast_settings(2).with_key_length_bits(128))
        .replenish(false)
        .initialize()
        .unwrap_err();
    assert!(matches!(err, CipherError::EngineInit { .. }));
}

#[test]
fn test_replenisher_needs_a_runtime() {
    let err = CipherService::initialize(fast_settings(1)).unwrap_err();
    assert!(matches!(err, CipherError::Scheduler { .. }));
}

#[test]
fn test_startup_errors_carry_context() {
    let err = CipherService::builder()
        .settings(fast_settings(2).with_iterations(0))
        .replenish(false)
        .initialize()
        .unwrap_err();
    assert!(err.to_string().contains("Initial pool fill"), "{err}");
}

#[test]
fn test_different_passphrases_do_not_interoperate() {
    let first = manual_service(1);
    let second = CipherService::builder()
        .settings(fast_settings(1).with_passphrase("another secret"))
        .replenish(false)
        .initialize()
        .unwrap();

    let ciphertext = first.encrypt("hello").unwrap();
    assert_ne!(second.encrypt("hello").unwrap(), ciphertext);
}
