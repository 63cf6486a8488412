use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::DeskError;

/// Hash a password into a PHC string (Argon2id, random salt).
pub fn hash_password(password: &str) -> Result<String, DeskError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| DeskError::PasswordHash(e.to_string()))
}

/// Well-formed Argon2id PHC string (default parameters) that no password
/// matches. Checked on the unknown-user login path so both failures cost one
/// Argon2 evaluation.
pub const UNKNOWN_USER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Constant-time check of `password` against a stored PHC string.
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("pw123").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("pw123", &hash));
        assert!(!verify_password("pw124", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same").expect("hash");
        let b = hash_password("same").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_user_hash_parses_and_never_matches() {
        let parsed = PasswordHash::new(UNKNOWN_USER_HASH).expect("valid PHC string");
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!verify_password("pw123", UNKNOWN_USER_HASH));
        assert!(!verify_password("", UNKNOWN_USER_HASH));
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("pw123", "not-a-phc-string"));
    }
}
