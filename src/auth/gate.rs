//! Keeps signed-out users away from screens that need a session.

use crate::{
    Error, Subscription,
    auth::{AuthProvider, Session},
    navigation::{Navigation, resolve},
};

/// Decides which screens the current viewer may see.
pub struct SessionGate<'a, A: ?Sized> {
    auth: &'a A,
}

impl<'a, A> SessionGate<'a, A>
where
    A: AuthProvider + ?Sized,
{
    /// Create a gate that checks sessions against `auth`.
    pub fn new(auth: &'a A) -> Self {
        Self { auth }
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.auth.current_session().is_some()
    }

    /// A live feed of session changes. Drop or unsubscribe it to stop listening.
    pub fn on_change(&self) -> Subscription<Option<Session>> {
        self.auth.on_session_change()
    }

    /// Decide where a viewer asking for `path` should end up.
    pub fn route(&self, path: &str) -> Navigation {
        resolve(self.auth.current_session().as_ref(), path)
    }

    /// The active session, for operations that need a signed in user.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotAuthenticated] if no one is signed in.
    pub fn require_session(&self) -> Result<Session, Error> {
        self.auth.current_session().ok_or(Error::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        auth::{SessionGate, SignUpForm, sign_out, sign_up},
        navigation::{Navigation, Screen},
        test_utils::get_test_auth_provider,
    };

    #[tokio::test]
    async fn gate_follows_session() {
        let auth = get_test_auth_provider();
        let gate = SessionGate::new(&auth);
        let mut changes = gate.on_change();

        assert!(!gate.is_authenticated());
        assert_eq!(gate.route("/dashboard"), Navigation::Redirect(Screen::Auth));
        assert_eq!(gate.require_session(), Err(Error::NotAuthenticated));

        let form = SignUpForm {
            username: "demo".to_owned(),
            email: "demo@example.com".to_owned(),
            password: "Demo@1234".to_owned(),
        };
        let session = sign_up(&auth, &form).await.unwrap();

        assert_eq!(changes.changed().await, Ok(Some(session.clone())));
        assert!(gate.is_authenticated());
        assert_eq!(gate.route("/auth"), Navigation::Redirect(Screen::Dashboard));
        assert_eq!(gate.require_session(), Ok(session));

        sign_out(&auth).await.unwrap();

        assert_eq!(changes.changed().await, Ok(None));
        assert!(!gate.is_authenticated());
    }
}
