//! The sign-up, sign-in, sign-out, password change and password reset flows.
//!
//! Each flow validates its inputs first and only contacts the auth provider
//! once every field has passed.

use crate::{
    Alert, Error, Field, FieldErrors, ProviderError,
    auth::{AuthProvider, Session, SignInForm, SignUpForm, ValidatedPassword, validate_email},
};

/// Register a new account and sign it in.
///
/// # Errors
///
/// Returns a validation error if any field is invalid, or
/// [ProviderError::EmailInUse] if the email address is already registered.
pub async fn sign_up<A>(auth: &A, form: &SignUpForm) -> Result<Session, Error>
where
    A: AuthProvider + ?Sized,
{
    let request = form.validate()?;

    if auth.identity_exists(&request.email).await? {
        return Err(ProviderError::EmailInUse.into());
    }

    let session = auth
        .sign_up(&request.email, &request.password, request.profile)
        .await?;

    Ok(session)
}

/// Sign in to an existing account.
pub async fn sign_in<A>(auth: &A, form: &SignInForm) -> Result<Session, Error>
where
    A: AuthProvider + ?Sized,
{
    let request = form.validate()?;
    let session = auth.sign_in(&request.email, &request.password).await?;

    Ok(session)
}

/// End the active session.
pub async fn sign_out<A>(auth: &A) -> Result<(), Error>
where
    A: AuthProvider + ?Sized,
{
    auth.sign_out().await?;

    Ok(())
}

/// Sign in with `current` and replace that account's password with
/// `new_password`. The session stays open.
///
/// # Errors
///
/// Returns a validation error if `new_password` is too weak, or the sign-in
/// error if the current email or password is wrong. The password is left
/// unchanged in both cases.
pub async fn change_password<A>(
    auth: &A,
    current: &SignInForm,
    new_password: &str,
) -> Result<Alert, Error>
where
    A: AuthProvider + ?Sized,
{
    let new_password = ValidatedPassword::new(new_password)
        .map_err(|error| FieldErrors::single(Field::Password, error.to_string()))?;

    sign_in(auth, current).await?;
    auth.change_password(&new_password).await?;

    Ok(Alert::updated("Password"))
}

/// Ask for a password reset message for the account registered with `email`.
///
/// Returns the alert to show when the request was accepted.
///
/// # Errors
///
/// - A validation error if `email` is empty.
/// - [ProviderError::UserNotFound] if no account uses `email`.
/// - [ProviderError::ResetEmailFailed] for any other failure.
pub async fn request_password_reset<A>(auth: &A, email: &str) -> Result<Alert, Error>
where
    A: AuthProvider + ?Sized,
{
    if email.is_empty() {
        return Err(FieldErrors::single(Field::Email, "Enter your email to reset password.").into());
    }

    let address = validate_email(email).map_err(|_| ProviderError::ResetEmailFailed)?;

    let result = match auth.identity_exists(&address).await {
        Ok(false) => Err(ProviderError::UserNotFound),
        Ok(true) => auth.request_password_reset(&address).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(()) => Ok(Alert::success(
            "Password reset",
            format!("Password reset email sent to {email}"),
        )),
        Err(ProviderError::UserNotFound) => Err(ProviderError::UserNotFound.into()),
        Err(error) => {
            tracing::error!("Password reset failed: {error}");
            Err(ProviderError::ResetEmailFailed.into())
        }
    }
}
