//! Password hashing for account credentials.
//!
//! Passwords are stored as the lowercase hex SHA-256 digest of the plaintext.
//! The plaintext itself is never stored or logged.

use std::fmt::Display;

use sha2::{Digest, Sha256};

/// A hashed password.
/// Not serializable, clients only ever see an [crate::Account].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password.
    pub fn from_raw_password(raw_password: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(raw_password.as_bytes())))
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> bool {
        Self::from_raw_password(raw_password) == *self
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod password_hash_tests {
    use super::PasswordHash;

    #[test]
    fn hash_matches_known_digest() {
        let hash = PasswordHash::from_raw_password("abc");

        assert_eq!(
            hash.as_ref(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_is_fixed_length_hex() {
        let hash = PasswordHash::from_raw_password("roostersgocockledoodledoo");

        assert_eq!(hash.as_ref().len(), 64);
        assert!(hash.as_ref().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::from_raw_password("okon");

        assert!(hash.verify("okon"));
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::from_raw_password("okon");

        assert!(!hash.verify("thewrongpassword"));
    }
}
