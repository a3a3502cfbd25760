//! Client-side checks on the sign-up and sign-in forms.

use std::str::FromStr;

use email_address::EmailAddress;

use crate::{
    Error, Field, FieldErrors,
    auth::{Profile, ValidatedPassword},
};

/// The reasons an email address is rejected.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum EmailError {
    /// The email field was left empty.
    #[error("Email is required.")]
    Missing,

    /// The text is not shaped like `local@domain.tld`.
    #[error("Invalid email format.")]
    InvalidFormat,
}

/// Check that `text` looks like `local@domain.tld` and parse it.
///
/// The address must have exactly one `@`, no whitespace, a non-empty local
/// part and a domain with a dot that is neither its first nor its last
/// character.
pub fn validate_email(text: &str) -> Result<EmailAddress, EmailError> {
    if text.is_empty() {
        return Err(EmailError::Missing);
    }

    if text.chars().any(char::is_whitespace) {
        return Err(EmailError::InvalidFormat);
    }

    let Some((local, domain)) = text.split_once('@') else {
        return Err(EmailError::InvalidFormat);
    };

    let domain_has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

    if local.is_empty() || domain.contains('@') || !domain_has_inner_dot {
        return Err(EmailError::InvalidFormat);
    }

    EmailAddress::from_str(text).map_err(|_| EmailError::InvalidFormat)
}

/// The raw inputs of the sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    /// The display name.
    pub username: String,
    /// The email address.
    pub email: String,
    /// The password in plain text.
    pub password: String,
}

/// A sign-up form that passed validation.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    /// The email address to register.
    pub email: EmailAddress,
    /// The password for the new account.
    pub password: ValidatedPassword,
    /// The profile to store with the account.
    pub profile: Profile,
}

impl SignUpForm {
    /// Check every field, collecting one message per failed field.
    pub fn validate(&self) -> Result<SignUpRequest, Error> {
        let mut errors = FieldErrors::new();

        let email = validate_email(&self.email)
            .map_err(|error| errors.push(Field::Email, error.to_string()))
            .ok();
        let password = ValidatedPassword::new(&self.password)
            .map_err(|error| errors.push(Field::Password, error.to_string()))
            .ok();

        if self.username.is_empty() {
            errors.push(Field::Username, "Username is required.");
        }

        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => Ok(SignUpRequest {
                profile: Profile {
                    username: self.username.clone(),
                    email: email.to_string(),
                },
                email,
                password,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

/// The raw inputs of the sign-in form.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    /// The email address.
    pub email: String,
    /// The password in plain text.
    pub password: String,
}

/// A sign-in form that passed validation.
#[derive(Debug, Clone)]
pub struct SignInRequest {
    /// The email address of the account.
    pub email: EmailAddress,
    /// The password of the account.
    pub password: ValidatedPassword,
}

impl SignInForm {
    /// Check every field, collecting one message per failed field.
    ///
    /// The password rules apply on sign-in too.
    pub fn validate(&self) -> Result<SignInRequest, Error> {
        let mut errors = FieldErrors::new();

        let email = validate_email(&self.email)
            .map_err(|error| errors.push(Field::Email, error.to_string()))
            .ok();
        let password = ValidatedPassword::new(&self.password)
            .map_err(|error| errors.push(Field::Password, error.to_string()))
            .ok();

        match (email, password) {
            (Some(email), Some(password)) => Ok(SignInRequest { email, password }),
            _ => Err(Error::Validation(errors)),
        }
    }
}
