//! Categories for grouping transactions.

mod domain;
mod form;
mod store;

pub use domain::{Category, CategoryId, CategoryName};
pub use form::{CategoryForm, NewCategory};
pub use store::CategoryStore;
