//! A scoped handle to a live feed of values.

use tokio::sync::watch;

use crate::Error;

type Release = Box<dyn FnOnce() + Send>;

/// A live feed of values, e.g. collection snapshots or session changes.
///
/// The latest value always replaces the previous one. The subscription is a
/// scoped resource: its release hook runs exactly once, either when
/// [Subscription::unsubscribe] is called or when the subscription is dropped.
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    release: Option<Release>,
}

impl<T: Clone> Subscription<T> {
    /// Wrap `receiver`, running `release` once when the subscription ends.
    pub fn new(receiver: watch::Receiver<T>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// The most recently delivered value.
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Whether a value has arrived that has not been read by [Subscription::changed].
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next value and return it.
    ///
    /// # Errors
    ///
    /// Returns [Error::FeedClosed] if the publisher has gone away.
    pub async fn changed(&mut self) -> Result<T, Error> {
        self.receiver
            .changed()
            .await
            .map_err(|_| Error::FeedClosed)?;

        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Stop receiving values and release the subscription.
    pub fn unsubscribe(mut self) {
        self.release();
    }
}

impl<T> Subscription<T> {
    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("released", &self.release.is_none())
            .finish()
    }
}
