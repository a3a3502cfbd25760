//! Defines the core data model for transactions and how it is decoded from
//! stored documents.

use std::fmt::Display;

use time::Date;

use crate::provider::{
    Document, DocumentId, FromDocument, Issues, date_field, number_field, optional_text_field,
    text_field,
};

/// The identifier the persistence provider assigns to a transaction.
pub type TransactionId = DocumentId;

/// Whether money was earned or spent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
    /// A stored value that is neither "income" nor "expense".
    ///
    /// These transactions are kept so they can be listed and searched, but
    /// they count towards neither income nor expense.
    Other(String),
}

impl TransactionKind {
    /// Read a stored type, keeping unrecognised values as [TransactionKind::Other].
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            other => TransactionKind::Other(other.to_owned()),
        }
    }

    /// Parse a type typed into a form, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything other than income or expense.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// The stored text of the type.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Other(raw) => raw,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions read back from the store are decoded leniently, so a
/// transaction may hold a zero amount, an empty category or no date if the
/// stored record was malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID assigned by the persistence provider.
    pub id: TransactionId,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The category label, e.g. "Food".
    pub category: String,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// When the transaction happened, or `None` if the stored date is invalid.
    pub date: Option<Date>,
    /// An optional free-text note.
    pub note: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionKind, category: &str, amount: f64) -> TransactionBuilder {
        TransactionBuilder {
            id: None,
            kind,
            category: category.to_owned(),
            amount,
            date: None,
            note: None,
        }
    }
}

/// A builder for creating [Transaction] instances, mostly for tests and
/// demo data.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: Option<TransactionId>,
    kind: TransactionKind,
    category: String,
    amount: f64,
    date: Option<Date>,
    note: Option<String>,
}

impl TransactionBuilder {
    /// Set the transaction's ID.
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(TransactionId::new(id));
        self
    }

    /// Set the date of the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the note of the transaction.
    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    /// Build the final [Transaction] instance.
    ///
    /// Transactions without an explicit ID get an empty one.
    pub fn finalise(self) -> Transaction {
        Transaction {
            id: self.id.unwrap_or_else(|| TransactionId::new("")),
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date: self.date,
            note: self.note,
        }
    }
}

impl FromDocument for Transaction {
    fn from_document(document: &Document) -> (Self, Issues) {
        let fields = &document.fields;
        let mut issues = Issues::new();

        // Older records stored the note under "description".
        let note = if fields.contains_key("note") {
            optional_text_field(fields, "note", &mut issues)
        } else {
            optional_text_field(fields, "description", &mut issues)
        };

        let transaction = Transaction {
            id: document.id.clone(),
            kind: TransactionKind::from_raw(&text_field(fields, "type", &mut issues)),
            category: text_field(fields, "category", &mut issues),
            amount: number_field(fields, "amount", &mut issues),
            date: date_field(fields, "date", &mut issues),
            note,
        };

        (transaction, issues)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        provider::{Document, DocumentId, FromDocument},
        test_utils::fields,
        transaction::{Transaction, TransactionKind},
    };

    fn document(value: serde_json::Value) -> Document {
        Document {
            id: DocumentId::new("t1"),
            fields: fields(value),
        }
    }

    #[test]
    fn decodes_well_formed_record() {
        let document = document(json!({
            "type": "expense",
            "category": "Food",
            "amount": 200,
            "date": "2024-01-10",
            "note": "Lunch",
        }));

        let (transaction, issues) = Transaction::from_document(&document);

        assert!(issues.is_empty(), "unexpected issues {issues:?}");
        assert_eq!(
            transaction,
            Transaction::build(TransactionKind::Expense, "Food", 200.0)
                .id("t1")
                .date(date!(2024 - 01 - 10))
                .note("Lunch")
                .finalise()
        );
    }

    #[test]
    fn malformed_record_decodes_to_neutral_values() {
        let document = document(json!({"type": "refund", "amount": "abc", "date": "tomorrow"}));

        let (transaction, issues) = Transaction::from_document(&document);

        assert_eq!(transaction.kind, TransactionKind::Other("refund".to_owned()));
        assert_eq!(transaction.category, "");
        assert_eq!(transaction.amount, 0.0);
        assert_eq!(transaction.date, None);
        assert_eq!(transaction.note, None);
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn reads_legacy_description_as_note() {
        let legacy = document(json!({"description": "Old note"}));
        let cleared = document(json!({"description": "Old note", "note": ""}));

        assert_eq!(
            Transaction::from_document(&legacy).0.note.as_deref(),
            Some("Old note")
        );
        assert_eq!(Transaction::from_document(&cleared).0.note, None);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!(TransactionKind::from_raw("Income"), TransactionKind::Other("Income".to_owned()));
        assert_eq!(TransactionKind::parse(" Income "), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("expense"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("refund"), None);
    }
}
