pub mod fixtures;

use cpool_cipher::derive;
use fixtures::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip_printable_strings(value in "\\PC{0,256}") {
        let service = manual_service(1);
        let ciphertext = service.encrypt(&value).unwrap();
        prop_assert_eq!(service.decrypt(&ciphertext).unwrap(), value);
    }

    #[test]
    fn ciphertext_is_whole_blocks_of_base64(value in "\\PC{0,128}") {
        let service = manual_service(1);
        let ciphertext = service.encrypt(&value).unwrap();
        let blocks = value.len() / 16 + 1;
        prop_assert_eq!(ciphertext.len(), (blocks * 16).div_ceil(3) * 4);
    }

    #[test]
    fn derivation_is_deterministic(passphrase in ".{1,32}", salt in ".{0,32}") {
        let first = derive(&passphrase, &salt, 10, 256).unwrap();
        let second = derive(&passphrase, &salt, 10, 256).unwrap();
        prop_assert_eq!(first, second);
    }
}

