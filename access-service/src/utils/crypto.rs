use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Session tokens are bearer credentials; 64 alphanumeric characters.
pub const SESSION_TOKEN_LENGTH: usize = 64;

/// Activation codes travel by email and are single-purpose.
pub const ACTIVATION_CODE_LENGTH: usize = 16;

/// Newtype for plaintext credentials to keep them out of logs.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Hex-encoded SHA-256 digest of the plaintext.
///
/// Deterministic and unsalted: the stored format is compatible with
/// credential records produced by earlier deployments. Changing to a
/// salted slow hash invalidates every stored digest, so that migration is
/// an operator decision, not something this function does quietly.
pub fn digest_password(password: &Password) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Recompute the digest and compare in constant time.
pub fn verify_password(password: &Password, digest: &str) -> bool {
    let computed = digest_password(password);
    computed.as_bytes().ct_eq(digest.as_bytes()).into()
}

/// Random string of `length` characters drawn uniformly from the
/// 62-character alphanumeric alphabet.
pub fn generate_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
