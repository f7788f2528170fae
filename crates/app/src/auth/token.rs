//! Session token generation and hashing.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a raw session token.
#[must_use]
pub fn generate_session_token() -> String {
    format!("cr_{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple())
}

/// Hash a raw token for storage and lookup.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_stable() {
        assert_eq!(hash_token("abc123"), hash_token("abc123"));
    }

    #[test]
    fn distinct_tokens_hash_differently() {
        let a = generate_session_token();
        let b = generate_session_token();

        assert_ne!(a, b);
        assert_ne!(hash_token(&a), hash_token(&b));
    }

    #[test]
    fn generated_tokens_carry_the_prefix() {
        assert!(
            generate_session_token().starts_with("cr_"),
            "token should be prefixed for log redaction tooling"
        );
    }
}
