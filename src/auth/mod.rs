//! Authentication: the auth provider contract, sign-up/sign-in flows and the
//! session gate that protects screens.

mod flow;
mod gate;
mod password;
mod sqlite;
mod validation;

use std::fmt::Display;

use async_trait::async_trait;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{ProviderError, Subscription};

pub use flow::{change_password, request_password_reset, sign_in, sign_out, sign_up};
pub use gate::SessionGate;
pub use password::{PasswordError, PasswordHash, ValidatedPassword};
pub use sqlite::{SqliteAuthProvider, create_auth_tables};
pub use validation::{EmailError, SignInForm, SignInRequest, SignUpForm, SignUpRequest, validate_email};

/// The identifier the auth provider assigns to a user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap a provider assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed in user.
///
/// A session is passed explicitly to every component that needs to know who
/// the current user is.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The provider assigned user ID, used to scope collections.
    pub user_id: UserId,
    /// The email address the user signed in with.
    pub email: EmailAddress,
    /// The display name chosen at sign-up, if the profile has one.
    pub username: Option<String>,
}

/// The profile stored alongside a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// The display name of the user.
    pub username: String,
    /// The email address of the user.
    pub email: String,
}

/// Creates accounts, signs users in and out and reports session changes.
///
/// Password strength and email format are checked before calling the provider,
/// see [SignUpForm] and [SignInForm].
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The active session, if a user is signed in.
    fn current_session(&self) -> Option<Session>;

    /// A live feed of session changes, starting with the current session.
    fn on_session_change(&self) -> Subscription<Option<Session>>;

    /// Whether an account is registered with `email`.
    async fn identity_exists(&self, email: &EmailAddress) -> Result<bool, ProviderError>;

    /// Create an account and sign it in.
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &ValidatedPassword,
        profile: Profile,
    ) -> Result<Session, ProviderError>;

    /// Sign in to an existing account.
    async fn sign_in(
        &self,
        email: &EmailAddress,
        password: &ValidatedPassword,
    ) -> Result<Session, ProviderError>;

    /// End the active session. Does nothing if no one is signed in.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Replace the password of the signed-in account.
    ///
    /// Returns [ProviderError::PermissionDenied] if no one is signed in.
    async fn change_password(&self, password: &ValidatedPassword) -> Result<(), ProviderError>;

    /// Ask the provider to send a password reset message to `email`.
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), ProviderError>;
}
