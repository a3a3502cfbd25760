//! Implements a SQLite backed auth provider.

use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use email_address::EmailAddress;
use rusqlite::{Connection, OptionalExtension};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::sync::watch;

use crate::{
    ProviderError, Subscription,
    auth::{AuthProvider, PasswordHash, Profile, Session, UserId, ValidatedPassword},
};

/// A registered account as stored in the user table.
struct UserRow {
    id: UserId,
    email: String,
    username: Option<String>,
    password_hash: PasswordHash,
}

impl UserRow {
    fn into_session(self) -> Session {
        let email = EmailAddress::from_str(&self.email)
            .unwrap_or_else(|_| EmailAddress::new_unchecked(self.email));

        Session {
            user_id: self.id,
            email,
            username: self.username,
        }
    }
}

/// Stores accounts in a SQLite database and keeps the active session in memory.
///
/// Passwords are stored as bcrypt hashes. Password reset requests are
/// recorded in the `password_reset_request` table for delivery by an
/// external mailer.
pub struct SqliteAuthProvider {
    connection: Arc<Mutex<Connection>>,
    session: watch::Sender<Option<Session>>,
    cost: u32,
}

impl SqliteAuthProvider {
    /// Create an auth provider over a database initialised with
    /// [crate::initialize_db], hashing with [PasswordHash::DEFAULT_COST].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self::with_cost(connection, PasswordHash::DEFAULT_COST)
    }

    /// Create an auth provider that hashes passwords with `cost` rounds.
    pub fn with_cost(connection: Arc<Mutex<Connection>>, cost: u32) -> Self {
        let (session, _) = watch::channel(None);

        Self {
            connection,
            session,
            cost,
        }
    }

    /// A raw receiver of session changes, e.g. for [crate::SqliteProvider::scoped_to].
    pub fn sessions(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, ProviderError> {
        self.connection
            .lock()
            .map_err(|_| ProviderError::Unavailable("the database lock was poisoned".to_owned()))
    }

    fn find_user(&self, email: &EmailAddress) -> Result<Option<UserRow>, ProviderError> {
        self.lock_connection()?
            .prepare("SELECT id, email, username, password FROM user WHERE email = ?1")?
            .query_row((email.as_str(),), |row| {
                let raw_password_hash: String = row.get(3)?;

                Ok(UserRow {
                    id: UserId::new(row.get::<_, String>(0)?),
                    email: row.get(1)?,
                    username: row.get(2)?,
                    password_hash: PasswordHash::new_unchecked(&raw_password_hash),
                })
            })
            .optional()
            .map_err(ProviderError::from)
    }

    fn start_session(&self, session: Session) -> Session {
        tracing::info!("User {} signed in", session.user_id);
        self.session.send_replace(Some(session.clone()));
        session
    }
}

async fn hash_password(password: ValidatedPassword, cost: u32) -> Result<PasswordHash, ProviderError> {
    tokio::task::spawn_blocking(move || PasswordHash::new(&password, cost))
        .await
        .map_err(|error| ProviderError::Hashing(error.to_string()))?
}

#[async_trait]
impl AuthProvider for SqliteAuthProvider {
    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn on_session_change(&self) -> Subscription<Option<Session>> {
        Subscription::new(self.session.subscribe(), || {})
    }

    async fn identity_exists(&self, email: &EmailAddress) -> Result<bool, ProviderError> {
        Ok(self.find_user(email)?.is_some())
    }

    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &ValidatedPassword,
        profile: Profile,
    ) -> Result<Session, ProviderError> {
        if self.find_user(email)?.is_some() {
            return Err(ProviderError::EmailInUse);
        }

        let password_hash = hash_password(password.clone(), self.cost).await?;
        let id = UserId::new(uuid::Uuid::new_v4().simple().to_string());

        let result = self.lock_connection()?.execute(
            "INSERT INTO user (id, email, username, password) VALUES (?1, ?2, ?3, ?4)",
            (
                id.as_str(),
                email.as_str(),
                &profile.username,
                password_hash.as_ref(),
            ),
        );

        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(error, _))
                if error.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(ProviderError::EmailInUse);
            }
            Err(error) => return Err(error.into()),
        }

        tracing::info!("Registered user {id}");

        Ok(self.start_session(Session {
            user_id: id,
            email: email.clone(),
            username: Some(profile.username),
        }))
    }

    async fn sign_in(
        &self,
        email: &EmailAddress,
        password: &ValidatedPassword,
    ) -> Result<Session, ProviderError> {
        let user = self.find_user(email)?.ok_or(ProviderError::UserNotFound)?;

        let password_hash = user.password_hash.clone();
        let raw_password = password.expose().to_owned();
        let is_match = tokio::task::spawn_blocking(move || password_hash.verify(&raw_password))
            .await
            .map_err(|error| ProviderError::Hashing(error.to_string()))?
            .map_err(|error| ProviderError::Hashing(error.to_string()))?;

        if !is_match {
            tracing::info!("Wrong password for user {}", user.id);
            return Err(ProviderError::WrongPassword);
        }

        Ok(self.start_session(user.into_session()))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if let Some(session) = self.session.send_replace(None) {
            tracing::info!("User {} signed out", session.user_id);
        }

        Ok(())
    }

    async fn change_password(&self, password: &ValidatedPassword) -> Result<(), ProviderError> {
        let session = self.current_session().ok_or(ProviderError::PermissionDenied)?;
        let password_hash = hash_password(password.clone(), self.cost).await?;

        let rows_affected = self.lock_connection()?.execute(
            "UPDATE user SET password = ?1 WHERE id = ?2",
            (password_hash.as_ref(), session.user_id.as_str()),
        )?;

        if rows_affected == 0 {
            return Err(ProviderError::UserNotFound);
        }

        tracing::info!("Password changed for user {}", session.user_id);

        Ok(())
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), ProviderError> {
        let user = self.find_user(email)?.ok_or(ProviderError::UserNotFound)?;
        let requested_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|_| ProviderError::ResetEmailFailed)?;

        self.lock_connection()?
            .execute(
                "INSERT INTO password_reset_request (user_id, requested_at) VALUES (?1, ?2)",
                (user.id.as_str(), requested_at),
            )
            .map_err(|error| {
                tracing::error!("Could not record password reset request: {error}");
                ProviderError::ResetEmailFailed
            })?;

        tracing::info!("Password reset requested for user {}", user.id);

        Ok(())
    }
}

/// Create the user and password reset tables.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_auth_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS user (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            username TEXT,
            password TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS password_reset_request (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            requested_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}
