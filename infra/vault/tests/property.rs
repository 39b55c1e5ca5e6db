pub mod fixtures;

use crwa_vault::{Cipher, Vault, VaultError};
use fixtures::{PASSWORD, sample_keys};
use proptest::prelude::*;

fn cipher() -> impl Strategy<Value = Cipher> {
    prop_oneof![Just(Cipher::Aes), Just(Cipher::ChaCha)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_bytes_survive_sealing(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        cipher in cipher(),
        compression in any::<bool>(),
    ) {
        let vault = Vault::builder().password(PASSWORD).cipher(cipher).compression(compression).build().unwrap();
        let sealed = vault.seal_bytes(&data).unwrap();
        let unsealed = vault.unseal_bytes(&sealed).unwrap();
        prop_assert_eq!(unsealed.as_slice(), data.as_slice());
    }

    #[test]
    fn any_flipped_byte_is_rejected(index in any::<prop::sample::Index>(), bit in 0u8..8, cipher in cipher()) {
        let vault = Vault::builder().password(PASSWORD).cipher(cipher).build().unwrap();
        let mut bytes = vault.seal(&sample_keys()).unwrap().into_bytes();

        let at = index.index(bytes.len());
        bytes[at] ^= 1 << bit;

        let err = vault.unseal(&bytes).unwrap_err();
        prop_assert!(
            matches!(err, VaultError::Decryption { .. } | VaultError::InvalidPayload { .. }),
            "unexpected error: {err}"
        );
    }
}
