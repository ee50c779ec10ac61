use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a random per-user salt (32 hex characters)
pub fn generate_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hash a password with the given salt
///
/// Returns `salt$digest` where `digest = SHA256(salt || password)` in hex.
/// The salt travels with the hash so verification needs no extra lookup.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{}${}", salt, hex::encode(hasher.finalize()))
}

/// Verify a password against a stored `salt$digest` value
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, _)) = stored.split_once('$') else {
        return false;
    };
    hash_password(password, salt) == stored
}

/// Generate a fresh opaque bearer token (64 hex characters)
///
/// Tokens are random, not derived from the identity; a user may hold any
/// number of live tokens at once.
pub fn generate_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Digest under which a token is stored server-side
///
/// Only the SHA-256 of the token ever touches the database, so a database
/// breach does not leak usable credentials.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_shape() {
        let hashed = hash_password("password123", "abc123");
        let (salt, digest) = hashed.split_once('$').unwrap();
        assert_eq!(salt, "abc123");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_password_deterministic() {
        assert_eq!(
            hash_password("password123", "salt"),
            hash_password("password123", "salt")
        );
    }

    #[test]
    fn test_hash_password_salt_matters() {
        assert_ne!(
            hash_password("password123", "salt-a"),
            hash_password("password123", "salt-b")
        );
    }

    #[test]
    fn test_verify_password_roundtrip() {
        let stored = hash_password("password123", &generate_salt());
        assert!(verify_password("password123", &stored));
        assert!(!verify_password("password124", &stored));
    }

    #[test]
    fn test_verify_password_malformed_stored_value() {
        assert!(!verify_password("password123", "no-separator"));
        assert!(!verify_password("password123", ""));
    }

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_token_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_token_digest_stable() {
        let token = generate_token();
        assert_eq!(token_digest(&token), token_digest(&token));
        assert_eq!(token_digest(&token).len(), 64);
    }
}
