//! Implements a SQLite backed persistence provider.
//!
//! Documents are stored one per row with their fields serialized as JSON.
//! Snapshots are published to in-process subscribers after every committed
//! change, while the connection lock is still held, so subscribers observe
//! snapshots in commit order.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use rusqlite::{Connection, Row};
use tokio::sync::watch;

use crate::{
    ProviderError, Session,
    provider::{
        CollectionPath, Document, DocumentId, Fields, PersistenceProvider, Snapshot, Subscription,
    },
};

/// A collection's publisher and the number of live subscriptions to it.
struct Feed {
    sender: watch::Sender<Snapshot>,
    subscribers: usize,
}

type Feeds = Arc<Mutex<HashMap<CollectionPath, Feed>>>;

/// Stores documents in a SQLite database and publishes live snapshots.
#[derive(Clone)]
pub struct SqliteProvider {
    connection: Arc<Mutex<Connection>>,
    feeds: Feeds,
    sessions: Option<watch::Receiver<Option<Session>>>,
}

impl SqliteProvider {
    /// Create a provider over a database initialised with [crate::initialize_db].
    ///
    /// The provider performs no access checks until [SqliteProvider::scoped_to]
    /// is used.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            feeds: Arc::new(Mutex::new(HashMap::new())),
            sessions: None,
        }
    }

    /// Only allow access to collections owned by the signed in user.
    ///
    /// `sessions` is usually [crate::SqliteAuthProvider::sessions]. Any
    /// operation on a collection the current session does not own fails with
    /// [ProviderError::PermissionDenied].
    pub fn scoped_to(mut self, sessions: watch::Receiver<Option<Session>>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// The number of live subscriptions to the collection at `path`.
    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.feeds
            .lock()
            .map(|feeds| feeds.get(path).map_or(0, |feed| feed.subscribers))
            .unwrap_or(0)
    }

    fn authorize(&self, path: &CollectionPath) -> Result<(), ProviderError> {
        let Some(sessions) = &self.sessions else {
            return Ok(());
        };

        match &*sessions.borrow() {
            Some(session) if path.is_owned_by(&session.user_id) => Ok(()),
            _ => {
                tracing::warn!("Denied access to {path}");
                Err(ProviderError::PermissionDenied)
            }
        }
    }

    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, ProviderError> {
        self.connection
            .lock()
            .map_err(|_| ProviderError::Unavailable("the database lock was poisoned".to_owned()))
    }

    /// Send the latest snapshot of `path` to its subscribers, if it has any.
    ///
    /// Must be called while holding the connection lock.
    fn publish(&self, connection: &Connection, path: &CollectionPath) -> Result<(), ProviderError> {
        let feeds = self
            .feeds
            .lock()
            .map_err(|_| ProviderError::Unavailable("the feed lock was poisoned".to_owned()))?;

        if let Some(feed) = feeds.get(path) {
            let snapshot = load_snapshot(connection, path)?;
            tracing::debug!("Publishing {} documents to {path}", snapshot.len());
            feed.sender.send_replace(Arc::new(snapshot));
        }

        Ok(())
    }
}

#[async_trait]
impl PersistenceProvider for SqliteProvider {
    async fn subscribe(&self, path: &CollectionPath) -> Result<Subscription<Snapshot>, ProviderError> {
        self.authorize(path)?;

        let connection = self.lock_connection()?;
        let mut feeds = self
            .feeds
            .lock()
            .map_err(|_| ProviderError::Unavailable("the feed lock was poisoned".to_owned()))?;

        let receiver = match feeds.get_mut(path) {
            Some(feed) => {
                feed.subscribers += 1;
                feed.sender.subscribe()
            }
            None => {
                let snapshot = load_snapshot(&connection, path)?;
                let (sender, receiver) = watch::channel(Arc::new(snapshot));
                feeds.insert(
                    path.clone(),
                    Feed {
                        sender,
                        subscribers: 1,
                    },
                );
                receiver
            }
        };

        tracing::debug!("Subscribed to {path}");

        let feeds = self.feeds.clone();
        let path = path.clone();

        Ok(Subscription::new(receiver, move || {
            release_subscription(&feeds, &path);
        }))
    }

    async fn create(&self, path: &CollectionPath, fields: Fields) -> Result<DocumentId, ProviderError> {
        self.authorize(path)?;

        let id = DocumentId::new(uuid::Uuid::new_v4().simple().to_string());
        let fields_json = serde_json::to_string(&fields)?;

        let connection = self.lock_connection()?;
        connection.execute(
            "INSERT INTO document (collection, id, fields) VALUES (?1, ?2, ?3)",
            (path.as_str(), id.as_str(), fields_json),
        )?;

        self.publish(&connection, path)?;

        Ok(id)
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), ProviderError> {
        self.authorize(path)?;

        let connection = self.lock_connection()?;

        let stored: String = connection
            .prepare("SELECT fields FROM document WHERE collection = ?1 AND id = ?2")?
            .query_row((path.as_str(), id.as_str()), |row| row.get(0))?;

        let mut merged: Fields = serde_json::from_str(&stored)?;
        merged.extend(fields);

        connection.execute(
            "UPDATE document SET fields = ?1 WHERE collection = ?2 AND id = ?3",
            (serde_json::to_string(&merged)?, path.as_str(), id.as_str()),
        )?;

        self.publish(&connection, path)
    }

    async fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<(), ProviderError> {
        self.authorize(path)?;

        let connection = self.lock_connection()?;
        let rows_affected = connection.execute(
            "DELETE FROM document WHERE collection = ?1 AND id = ?2",
            (path.as_str(), id.as_str()),
        )?;

        if rows_affected == 0 {
            return Err(ProviderError::NotFound);
        }

        self.publish(&connection, path)
    }
}

fn release_subscription(feeds: &Feeds, path: &CollectionPath) {
    let Ok(mut feeds) = feeds.lock() else {
        return;
    };

    if let Some(feed) = feeds.get_mut(path) {
        feed.subscribers = feed.subscribers.saturating_sub(1);

        if feed.subscribers == 0 {
            feeds.remove(path);
        }
    }

    tracing::debug!("Unsubscribed from {path}");
}

fn load_snapshot(connection: &Connection, path: &CollectionPath) -> Result<Vec<Document>, ProviderError> {
    let rows = connection
        .prepare("SELECT id, fields FROM document WHERE collection = ?1 ORDER BY seq ASC")?
        .query_map((path.as_str(),), map_row)?
        .collect::<Result<Vec<(String, String)>, rusqlite::Error>>()?;

    rows.into_iter()
        .map(|(id, fields_json)| -> Result<Document, ProviderError> {
            let fields: Fields = serde_json::from_str(&fields_json)?;

            Ok(Document {
                id: DocumentId::new(id),
                fields,
            })
        })
        .collect()
}

fn map_row(row: &Row) -> Result<(String, String), rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?))
}

/// Create the document table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS document (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            fields TEXT NOT NULL,
            UNIQUE(collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_document_collection ON document(collection);",
    )?;

    Ok(())
}
