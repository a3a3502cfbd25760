//! Transactions: the domain model, the add/edit form and the store adapter.

mod core;
mod form;
mod store;

pub use core::{Transaction, TransactionBuilder, TransactionId, TransactionKind};
pub use form::{NewTransaction, TransactionForm};
pub use store::{TransactionOrder, TransactionStore};
