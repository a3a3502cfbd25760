//! Defines the app level error type and the messages shown to users.

use std::fmt::Display;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more form fields failed client-side validation.
    ///
    /// Validation happens before any provider is contacted, so nothing has
    /// been written when this error is returned.
    #[error("{0}")]
    Validation(FieldErrors),

    /// A call to the auth or persistence provider failed.
    ///
    /// These errors are reported to the user and never retried automatically.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider closed a live feed while it was still being read.
    #[error("the live feed was closed by the provider")]
    FeedClosed,

    /// A protected operation was attempted without an active session.
    #[error("you must sign in first")]
    NotAuthenticated,
}

impl Error {
    /// The message to show the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(errors) => errors.to_string(),
            Error::Provider(error) => error.to_string(),
            Error::FeedClosed => "Lost connection to the data store.".to_owned(),
            Error::NotAuthenticated => "Please sign in to continue.".to_owned(),
        }
    }
}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Error::Validation(value)
    }
}

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The display name chosen at sign-up.
    Username,
    /// The email address used as the sign-in identity.
    Email,
    /// The account password.
    Password,
    /// Whether a transaction or category is income or an expense.
    Type,
    /// The category label of a transaction.
    Category,
    /// The amount of a transaction.
    Amount,
    /// The date of a transaction.
    Date,
    /// The name of a category.
    Name,
    /// The start of a date filter.
    DateFrom,
    /// The end of a date filter.
    DateTo,
}

impl Field {
    /// The name of the form field as shown next to its input.
    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::Type => "type",
            Field::Category => "category",
            Field::Amount => "amount",
            Field::Date => "date",
            Field::Name => "name",
            Field::DateFrom => "from",
            Field::DateTo => "to",
        }
    }
}

/// Inline validation messages, at most one per field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(Field, String)>);

impl FieldErrors {
    /// Create an empty set of field errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`, replacing any earlier message.
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();

        match self.0.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, existing_message)) => *existing_message = message,
            None => self.0.push((field, message)),
        }
    }

    /// Create field errors holding a single message.
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// The message recorded for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| *existing == field)
            .map(|(_, message)| message.as_str())
    }

    /// Whether every field passed validation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the failed fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Return `value` if no errors were recorded, otherwise a validation error.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Error> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|(_, message)| message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// A failure reported by the auth or persistence provider.
///
/// The display text of each variant is the message shown to the user.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached or is busy.
    #[error("Could not reach the data store: {0}")]
    Unavailable(String),

    /// The current session is not allowed to access the collection.
    #[error("You do not have permission to do that.")]
    PermissionDenied,

    /// The record does not exist, it may have been deleted elsewhere.
    #[error("The record could not be found. It may have been deleted.")]
    NotFound,

    /// An account is already registered with the email address.
    #[error("Email already in use.")]
    EmailInUse,

    /// The provider rejected the email address.
    #[error("Invalid email address.")]
    InvalidEmail,

    /// The password did not match the account.
    #[error("Incorrect password.")]
    WrongPassword,

    /// No account is registered with the email address.
    #[error("No user found with this email.")]
    UserNotFound,

    /// The password reset request could not be sent.
    #[error("Failed to send reset email. Check the address and try again.")]
    ResetEmailFailed,

    /// The password could not be hashed.
    ///
    /// The inner string is for logs only and is not shown to the user.
    #[error("Something went wrong while securing your password.")]
    Hashing(String),

    /// An unexpected storage error.
    #[error("An unexpected storage error occurred: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for ProviderError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => ProviderError::NotFound,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked,
                    ..
                },
                _,
            ) => ProviderError::Unavailable(value.to_string()),
            error => ProviderError::Storage(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(value: serde_json::Error) -> Self {
        ProviderError::Storage(value.to_string())
    }
}

/// Describes a stored record that does not have the expected shape.
///
/// These are never returned from aggregation. Decoders substitute a neutral
/// value (zero, the empty string, no date) and log the problem.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DataShapeError {
    /// The field is absent or null.
    #[error("field \"{0}\" is missing")]
    MissingField(&'static str),

    /// The field is present but holds an unusable value.
    #[error("field \"{field}\" has the unusable value {value}")]
    InvalidValue {
        /// The name of the stored field.
        field: &'static str,
        /// The offending value, rendered as JSON.
        value: String,
    },
}
