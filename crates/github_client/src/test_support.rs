//! Test helpers: a shared RSA key pair and an [`AppIdentity`](crate::AppIdentity) built on it.
//!
//! Compiled for this crate's tests and for dependents enabling the `test-utils` feature.

use std::sync::OnceLock;

use rand::thread_rng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// App id used by test identities.
pub const TEST_APP_ID: u64 = 12345;

struct TestKeyPair {
    private_pem: String,
    public_pem: String,
}

// Key generation is slow in debug builds, so every test shares one key pair.
fn key_pair() -> &'static TestKeyPair {
    static KEYS: OnceLock<TestKeyPair> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut rng = thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        let public_key = RsaPublicKey::from(&private_key);
        TestKeyPair {
            private_pem: private_key
                .to_pkcs8_pem(LineEnding::LF)
                .expect("Failed to encode private key")
                .to_string(),
            public_pem: public_key
                .to_public_key_pem(LineEnding::LF)
                .expect("Failed to encode public key"),
        }
    })
}

/// PKCS#8 PEM of the shared private key.
pub fn create_test_pem() -> String {
    key_pair().private_pem.clone()
}

/// PEM of the shared public key, for verifying signed assertions.
pub fn create_test_public_pem() -> String {
    key_pair().public_pem.clone()
}

/// Identity for [`TEST_APP_ID`] signing with the shared key.
pub fn create_test_identity() -> crate::AppIdentity {
    crate::AppIdentity::from_pem(TEST_APP_ID, &create_test_pem()).expect("valid test identity")
}
