//! Expense Manager is a personal expense tracker.
//!
//! Users authenticate, record income and expense transactions with categories,
//! and view aggregated balances and charts.
//!
//! Persistence, authentication and live change notification are delegated to
//! providers ([PersistenceProvider] and [AuthProvider]). This library ships a
//! SQLite-backed implementation of both so the whole system can run locally.
//! The dashboard core ([aggregation] and [pagination]) is made of pure
//! functions over in-memory lists.

#![warn(missing_docs)]

pub mod aggregation;
pub mod alert;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod date;
pub mod db;
mod error;
pub mod html;
pub mod logging;
pub mod navigation;
pub mod pagination;
pub mod provider;
pub mod store;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use alert::{Alert, AlertType};
pub use auth::{AuthProvider, Session, SqliteAuthProvider, UserId};
pub use db::initialize as initialize_db;
pub use error::{DataShapeError, Error, Field, FieldErrors, ProviderError};
pub use provider::{PersistenceProvider, SqliteProvider, Subscription};
