//! Salted password hashing.
//!
//! Each user row stores its own random salt next to the bcrypt hash. The salt
//! is appended to the plaintext before hashing, so two accounts sharing a
//! password still produce unrelated inputs to bcrypt.

use bcrypt::{DEFAULT_COST, hash, verify};
use rand::Rng;

use crate::errors::AppError;

/// Length of the per-user salt, in characters.
pub const SALT_LENGTH: usize = 16;

/// Longest password, in bytes, that still leaves room for the salt inside
/// bcrypt's 72-byte input.
pub const MAX_PASSWORD_BYTES: usize = 72 - SALT_LENGTH;

const SALT_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&()*+,-./:;<=>?@[]^_{|}~";

pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LENGTH)
        .map(|_| SALT_CHARSET[rng.gen_range(0..SALT_CHARSET.len())] as char)
        .collect()
}

/// Hashes `password` with `salt` appended.
///
/// Refuses input longer than bcrypt reads, which would otherwise drop the
/// salt from the hash.
pub fn hash_password(password: &str, salt: &str) -> Result<String, AppError> {
    if password.len() + salt.len() > 72 {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(format!("{password}{salt}"), DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, salt: &str, hashed: &str) -> Result<bool, AppError> {
    verify(format!("{password}{salt}"), hashed)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_salt_length_and_charset() {
        let salt = generate_salt();
        assert_eq!(salt.len(), SALT_LENGTH);
        assert!(salt.bytes().all(|b| SALT_CHARSET.contains(&b)));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_hash_and_verify_with_salt() {
        let salt = generate_salt();
        let hashed = hash_password("correct horse", &salt).unwrap();

        assert!(verify_password("correct horse", &salt, &hashed).unwrap());
        assert!(!verify_password("wrong horse", &salt, &hashed).unwrap());
    }

    #[test]
    fn test_verify_requires_matching_salt() {
        let hashed = hash_password("password123", "salt-a").unwrap();
        assert!(!verify_password("password123", "salt-b", &hashed).unwrap());
    }

    #[test]
    fn test_hash_rejects_input_past_bcrypt_limit() {
        let salt = generate_salt();
        let long = "\u{1D11E}".repeat(20);
        assert!(long.len() > MAX_PASSWORD_BYTES);
        assert!(hash_password(&long, &salt).is_err());

        let fits = "a".repeat(MAX_PASSWORD_BYTES);
        let hashed = hash_password(&fits, &salt).unwrap();
        assert!(!verify_password(&fits, &generate_salt(), &hashed).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash_errors() {
        assert!(verify_password("password123", "", "not_a_bcrypt_hash").is_err());
    }
}
