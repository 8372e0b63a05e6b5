//! Password reset tokens.
//!
//! The plaintext token travels in the reset email and nowhere else; the
//! store only ever holds its SHA-256 digest, so a store compromise does not
//! yield replayable reset links.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of the random token in bytes (hex-encoded for transport).
const TOKEN_BYTES: usize = 20;

/// Generate a fresh random reset token, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// The one-way digest of a plaintext token, as stored by the credential
/// store and matched on during reset.
pub fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_deterministic_and_not_the_plaintext() {
        let token = generate_token();
        let d = digest(&token);
        assert_eq!(d, digest(&token));
        assert_ne!(d, token);
        // SHA-256 hex
        assert_eq!(d.len(), 64);
    }
}
