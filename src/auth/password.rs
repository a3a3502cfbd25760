//! Password rules and hashing.
//!
//! `ValidatedPassword` wraps a string and ensures it satisfies the password rules.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};

use crate::ProviderError;

/// The reasons a password is rejected.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The password field was left empty.
    #[error("Password is required.")]
    Missing,

    /// The password does not satisfy the character class and length rules.
    #[error(
        "Password must include 1 uppercase, 1 lowercase, 1 number, 1 @ symbol, and be at least 8 characters."
    )]
    TooWeak,
}

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// The minimum number of characters in a password.
    pub const MIN_LENGTH: usize = 8;

    /// Create and validate a new password from a string.
    ///
    /// A valid password has at least [ValidatedPassword::MIN_LENGTH]
    /// characters, including a lower-case letter, an upper-case letter, a
    /// digit and an `@`, and no line breaks.
    ///
    /// # Errors
    ///
    /// Returns [PasswordError::Missing] for an empty string and
    /// [PasswordError::TooWeak] if any rule is broken.
    pub fn new(raw_password: &str) -> Result<Self, PasswordError> {
        if raw_password.is_empty() {
            return Err(PasswordError::Missing);
        }

        let is_strong = raw_password.chars().count() >= Self::MIN_LENGTH
            && raw_password.chars().any(|c| c.is_ascii_lowercase())
            && raw_password.chars().any(|c| c.is_ascii_uppercase())
            && raw_password.chars().any(|c| c.is_ascii_digit())
            && raw_password.contains('@')
            && !raw_password.contains(['\n', '\r', '\u{2028}', '\u{2029}']);

        if is_strong {
            Ok(Self(raw_password.to_owned()))
        } else {
            Err(PasswordError::TooWeak)
        }
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// The caller should ensure that `raw_password` satisfies the password rules.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to
    /// verify a password. Pass in [PasswordHash::DEFAULT_COST] to use the
    /// recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: &ValidatedPassword, cost: u32) -> Result<Self, ProviderError> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| ProviderError::Hashing(error.to_string()))
    }

    /// Wrap a hash read back from storage.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}


#[cfg(test)]
mod password_hash_tests {
    use crate::auth::{PasswordHash, ValidatedPassword};

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let password = ValidatedPassword::new_unchecked("Roosters@1");
        let hash = PasswordHash::new(&password, 4).unwrap();

        assert!(hash.verify("Roosters@1").unwrap());
        assert!(!hash.verify("the_wrong_password").unwrap());
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let password = ValidatedPassword::new_unchecked("Turkeys@1");
        let hash = PasswordHash::new(&password, 4).unwrap();
        let dupe_hash = PasswordHash::new(&password, 4).unwrap();

        assert_ne!(hash, dupe_hash);
    }
}
