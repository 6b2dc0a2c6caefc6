//! Opaque refresh tokens.
//!
//! A refresh token is 40 bytes from the OS random source, hex-encoded. The
//! plaintext is handed to the client once; the account store keeps only the
//! SHA-256 digest produced by [`digest_refresh_token`].

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

const REFRESH_TOKEN_BYTES: usize = 40;

pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest stored in place of the plaintext token.
pub fn digest_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 80);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(generate_refresh_token(), generate_refresh_token());
    }

    #[test]
    fn test_digest_is_stable_and_hides_token() {
        let token = generate_refresh_token();
        let digest = digest_refresh_token(&token);
        assert_eq!(digest, digest_refresh_token(&token));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, token);
    }
}
