//! Live feeds of decoded domain records, shared by the store adapters.

use crate::{
    Error,
    provider::{Document, Snapshot, Subscription},
};

/// Turns a snapshot into ordered domain records.
pub type Decoder<T> = fn(&[Document]) -> Vec<T>;

/// A live, fully replacing list of domain records.
///
/// Every snapshot delivered by the provider replaces the previous list; there
/// is no optimistic local state. The underlying subscription is released
/// exactly once, by [Feed::unsubscribe] or when the feed is dropped.
pub struct Feed<T> {
    subscription: Subscription<Snapshot>,
    decode: Decoder<T>,
}

impl<T> Feed<T> {
    pub(crate) fn new(subscription: Subscription<Snapshot>, decode: Decoder<T>) -> Self {
        Self {
            subscription,
            decode,
        }
    }

    /// The records in the most recent snapshot.
    pub fn current(&self) -> Vec<T> {
        (self.decode)(&self.subscription.current())
    }

    /// Wait for the next snapshot and return its records.
    ///
    /// # Errors
    ///
    /// Returns [Error::FeedClosed] if the provider closed the feed.
    pub async fn changed(&mut self) -> Result<Vec<T>, Error> {
        let snapshot = self.subscription.changed().await?;

        Ok((self.decode)(&snapshot))
    }

    /// Stop receiving snapshots.
    pub fn unsubscribe(self) {
        self.subscription.unsubscribe();
    }
}

impl<T> std::fmt::Debug for Feed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("subscription", &self.subscription)
            .finish()
    }
}
