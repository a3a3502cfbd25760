//! The persistence provider contract and its SQLite implementation.
//!
//! A provider stores per-user collections of schemaless documents and
//! delivers each collection as a live feed of full snapshots. The store
//! adapters in [crate::transaction] and [crate::category] sit on top of this
//! contract and turn documents into domain records.

mod document;
mod sqlite;
mod subscription;

use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ProviderError, auth::UserId};

pub use document::{FromDocument, Issues, date_field, number_field, optional_text_field, text_field};
pub use sqlite::{SqliteProvider, create_document_table};
pub use subscription::Subscription;

/// The fields of a stored document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A full, point-in-time list of the documents in a collection, in commit order.
///
/// Each snapshot replaces the previously delivered one.
pub type Snapshot = Arc<Vec<Document>>;

/// The opaque identifier a provider assigns to a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a provider assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// A stored record: its identifier and its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The identifier assigned by the provider.
    pub id: DocumentId,
    /// The record's fields as JSON values.
    pub fields: Fields,
}

/// The location of a per-user collection, e.g. `users/{uid}/transactions`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    const USERS: &'static str = "users";

    /// The collection holding `user_id`'s transactions.
    pub fn transactions(user_id: &UserId) -> Self {
        Self::for_user(user_id, "transactions")
    }

    /// The collection holding `user_id`'s categories.
    pub fn categories(user_id: &UserId) -> Self {
        Self::for_user(user_id, "categories")
    }

    fn for_user(user_id: &UserId, collection: &str) -> Self {
        Self(format!("{}/{user_id}/{collection}", Self::USERS))
    }

    /// The path as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the collection belongs to `user_id`.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        let mut segments = self.0.split('/');

        segments.next() == Some(Self::USERS) && segments.next() == Some(user_id.as_str())
    }
}

impl Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stores documents in per-user collections and publishes live snapshots.
///
/// Every method may fail with a transport or permission error. Callers
/// report failures to the user and do not retry.
#[async_trait]
pub trait PersistenceProvider: Send + Sync {
    /// Subscribe to the live snapshots of the collection at `path`.
    ///
    /// The returned subscription holds the current snapshot immediately and
    /// is updated after every committed change. It must be released exactly
    /// once, which happens on [Subscription::unsubscribe] or on drop.
    async fn subscribe(&self, path: &CollectionPath) -> Result<Subscription<Snapshot>, ProviderError>;

    /// Add a new document to the collection and return its identifier.
    async fn create(&self, path: &CollectionPath, fields: Fields) -> Result<DocumentId, ProviderError>;

    /// Merge `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [ProviderError::NotFound] if the document does not exist.
    async fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), ProviderError>;

    /// Remove a document from the collection.
    ///
    /// # Errors
    ///
    /// Returns [ProviderError::NotFound] if the document does not exist.
    async fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<(), ProviderError>;
}

#[cfg(test)]
mod collection_path_tests {
    use crate::{auth::UserId, provider::CollectionPath};

    #[test]
    fn paths_are_scoped_by_user() {
        let user_id = UserId::new("abc123");

        assert_eq!(
            CollectionPath::transactions(&user_id).as_str(),
            "users/abc123/transactions"
        );
        assert_eq!(
            CollectionPath::categories(&user_id).as_str(),
            "users/abc123/categories"
        );
    }

    #[test]
    fn ownership_checks_user_segment() {
        let owner = UserId::new("abc123");
        let other = UserId::new("abc");
        let path = CollectionPath::transactions(&owner);

        assert!(path.is_owned_by(&owner));
        assert!(!path.is_owned_by(&other));
    }
}
