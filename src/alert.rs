//! Success and error messages shown to users after an action.

use std::fmt::Display;

use crate::Error;

/// Whether an alert reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    /// The action completed.
    Success,
    /// The action failed.
    Error,
}

/// A message reporting the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Whether the action succeeded.
    pub alert_type: AlertType,
    /// A short heading, e.g. "Added!".
    pub title: String,
    /// The body text.
    pub message: String,
}

impl Alert {
    /// Create a new success alert.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create a new error alert.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// The alert for a record that was created, e.g. "Transaction has been added.".
    pub fn added(noun: &str) -> Self {
        Self::success("Added!", format!("{noun} has been added."))
    }

    /// The alert for a record that was edited.
    pub fn updated(noun: &str) -> Self {
        Self::success("Updated!", format!("{noun} has been updated."))
    }

    /// The alert for a record that was removed.
    pub fn deleted(noun: &str) -> Self {
        Self::success("Deleted!", format!("{noun} has been removed."))
    }

    /// The alert for a failed action.
    pub fn from_error(error: &Error) -> Self {
        Self::error("Error!", error.user_message())
    }
}

impl Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Alert, AlertType, Error, ProviderError};

    #[test]
    fn crud_alerts() {
        assert_eq!(
            Alert::added("Transaction").to_string(),
            "Added! Transaction has been added."
        );
        assert_eq!(Alert::updated("Category").title, "Updated!");
        assert_eq!(Alert::deleted("Category").alert_type, AlertType::Success);
    }

    #[test]
    fn error_alert_uses_user_message() {
        let alert = Alert::from_error(&Error::Provider(ProviderError::PermissionDenied));

        assert_eq!(alert.alert_type, AlertType::Error);
        assert_eq!(alert.message, "You do not have permission to do that.");
        assert_eq!(
            alert.to_string(),
            "Error! You do not have permission to do that."
        );
    }
}
