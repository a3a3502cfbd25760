//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Field, FieldErrors,
    provider::{Document, DocumentId, FromDocument, Issues, text_field},
    transaction::TransactionKind,
};

/// The identifier the persistence provider assigns to a category.
pub type CategoryId = DocumentId;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return a validation error if `name` is empty after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(FieldErrors::single(Field::Name, "Category name cannot be empty").into())
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Whether two names are the same ignoring case.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// A label for grouping transactions (e.g., 'Groceries', 'Salary').
///
/// Categories read back from the store keep their stored name even if it is
/// blank, so malformed records still show up in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// The ID assigned by the persistence provider.
    pub id: CategoryId,
    /// The name of the category.
    pub name: CategoryName,
    /// Whether the category is for income or expenses.
    pub kind: TransactionKind,
}

impl FromDocument for Category {
    fn from_document(document: &Document) -> (Self, Issues) {
        let mut issues = Issues::new();
        let name = text_field(&document.fields, "name", &mut issues);
        let kind = text_field(&document.fields, "type", &mut issues);

        let category = Category {
            id: document.id.clone(),
            name: CategoryName::new_unchecked(name.trim()),
            kind: TransactionKind::from_raw(&kind),
        };

        (category, issues)
    }
}
