//! Salted and hashed passwords.
//!
//! [PasswordHash] wraps a bcrypt hash string. Hashing is salted internally by bcrypt and the cost
//! factor is chosen by the caller, so tests can use a cheap cost while the server uses
//! [PasswordHash::DEFAULT_COST].

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `raw_password` with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed, e.g. `cost` is
    /// outside of the range bcrypt supports.
    pub fn new(raw_password: &str, cost: u32) -> Result<Self, Error> {
        match hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
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
    ///
    /// Returns `false` on a mismatch and also when the stored hash is malformed, in which case
    /// the bcrypt error is logged.
    pub fn verify(&self, raw_password: &str) -> bool {
        match verify(raw_password, &self.0) {
            Ok(is_match) => is_match,
            Err(error) => {
                tracing::warn!("could not verify password against stored hash: {error}");
                false
            }
        }
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
    use crate::{Error, PasswordHash};

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert!(hash.verify("okon"));
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert!(!hash.verify("thewrongpassword"));
    }

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let hash = PasswordHash::new("pw1", 4).unwrap();

        assert!(hash.verify("pw1"));
        assert!(!hash.verify("pw2"));
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let hash = PasswordHash::new("turkeysgogobblegobble", 4).unwrap();
        let dupe_hash = PasswordHash::new("turkeysgogobblegobble", 4).unwrap();

        assert_ne!(hash, dupe_hash);
        assert!(dupe_hash.verify("turkeysgogobblegobble"));
    }

    #[test]
    fn hash_does_not_contain_plaintext() {
        let hash = PasswordHash::new("roostersgocockledoodledoo", 4).unwrap();

        assert!(!hash.to_string().contains("roostersgocockledoodledoo"));
    }

    #[test]
    fn verify_returns_false_for_malformed_hash() {
        let hash = PasswordHash::new_unchecked("definitely not a bcrypt hash");

        assert!(!hash.verify("hunter2"));
    }

    #[test]
    fn verify_returns_false_for_empty_hash() {
        let hash = PasswordHash::new_unchecked("");

        assert!(!hash.verify(""));
    }

    #[test]
    fn new_fails_on_invalid_cost() {
        let result = PasswordHash::new("hunter2", 1);

        assert!(matches!(result, Err(Error::HashingError(_))));
    }
}
