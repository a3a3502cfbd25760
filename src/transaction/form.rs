//! The add/edit transaction form and its validation.

use serde_json::json;
use time::Date;

use crate::{
    Error, Field, FieldErrors,
    date::{format_date, parse_date},
    provider::Fields,
    transaction::{Transaction, TransactionKind},
};

/// The raw inputs of the add/edit transaction dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    /// "income" or "expense".
    pub kind: String,
    /// The category label.
    pub category: String,
    /// The amount as typed, e.g. "12.50".
    pub amount: String,
    /// The date as `YYYY-MM-DD`.
    pub date: String,
    /// An optional note.
    pub note: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            kind: TransactionKind::Expense.as_str().to_owned(),
            category: String::new(),
            amount: String::new(),
            date: String::new(),
            note: String::new(),
        }
    }
}

impl TransactionForm {
    /// A form pre-filled with an existing transaction, for editing.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            kind: transaction.kind.as_str().to_owned(),
            category: transaction.category.clone(),
            amount: transaction.amount.to_string(),
            date: transaction.date.map(format_date).unwrap_or_default(),
            note: transaction.note.clone().unwrap_or_default(),
        }
    }

    /// Check the form, collecting one message per failed field.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        let mut errors = FieldErrors::new();

        let kind = TransactionKind::parse(&self.kind);
        if kind.is_none() {
            errors.push(Field::Type, "Type must be income or expense.");
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.push(Field::Category, "Category is required.");
        }

        let amount = parse_amount(&self.amount).map_err(|message| errors.push(Field::Amount, message));

        let date = if self.date.trim().is_empty() {
            errors.push(Field::Date, "Date is required.");
            None
        } else {
            let date = parse_date(&self.date);
            if date.is_none() {
                errors.push(Field::Date, "Enter a valid date.");
            }
            date
        };

        let note = Some(self.note.trim())
            .filter(|note| !note.is_empty())
            .map(str::to_owned);

        match (kind, amount, date) {
            (Some(kind), Ok(amount), Some(date)) if errors.is_empty() => Ok(NewTransaction {
                kind,
                category: category.to_owned(),
                amount,
                date,
                note,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

/// The largest amount a single transaction may have.
const MAX_AMOUNT: f64 = 1e12;

fn parse_amount(text: &str) -> Result<f64, &'static str> {
    let text = text.trim();

    if text.is_empty() {
        return Err("Amount is required.");
    }

    match text.parse::<f64>() {
        Ok(amount) if !amount.is_finite() => Err("Amount must be a number."),
        Ok(amount) if amount < 0.0 => Err("Amount cannot be negative."),
        Ok(amount) if amount > MAX_AMOUNT => Err("Amount is too large."),
        Ok(amount) => Ok(amount),
        Err(_) => Err("Amount must be a number."),
    }
}

/// A transaction form that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Income or expense.
    pub kind: TransactionKind,
    /// The trimmed, non-empty category label.
    pub category: String,
    /// The non-negative amount.
    pub amount: f64,
    /// The date of the transaction.
    pub date: Date,
    /// The trimmed note, if one was given.
    pub note: Option<String>,
}

impl NewTransaction {
    /// The document fields for this transaction.
    ///
    /// An absent note is stored as the empty string so that editing a
    /// transaction can clear its note.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("type".to_owned(), json!(self.kind.as_str()));
        fields.insert("category".to_owned(), json!(self.category));
        fields.insert("amount".to_owned(), json!(self.amount));
        fields.insert("date".to_owned(), json!(format_date(self.date)));
        fields.insert("note".to_owned(), json!(self.note.as_deref().unwrap_or_default()));
        fields
    }
}
