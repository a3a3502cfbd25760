//! Lenient decoding of stored documents into domain records.
//!
//! Stored records are not trusted to have the expected shape. The field
//! readers below never fail: they substitute a neutral value and record a
//! [DataShapeError] describing what was wrong.

use serde_json::Value;
use time::Date;

use crate::{
    DataShapeError,
    date::parse_stored_date,
    provider::{Document, Fields},
};

/// The data shape problems found while decoding one document.
pub type Issues = Vec<DataShapeError>;

/// Builds a domain record from a stored document without failing.
pub trait FromDocument: Sized {
    /// Decode `document`, returning the record and any problems found.
    fn from_document(document: &Document) -> (Self, Issues);

    /// Decode every document in a snapshot, logging malformed records.
    fn from_snapshot(documents: &[Document]) -> Vec<Self> {
        documents
            .iter()
            .map(|document| {
                let (record, issues) = Self::from_document(document);

                for issue in issues {
                    tracing::warn!(id = %document.id, "Malformed record: {issue}");
                }

                record
            })
            .collect()
    }
}

/// Read a text field, substituting the empty string.
pub fn text_field(fields: &Fields, name: &'static str, issues: &mut Issues) -> String {
    match fields.get(name) {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => {
            issues.push(DataShapeError::MissingField(name));
            String::new()
        }
        Some(other) => {
            issues.push(invalid(name, other));
            String::new()
        }
    }
}

/// Read a text field that may legitimately be absent.
///
/// Blank text is treated as absent.
pub fn optional_text_field(fields: &Fields, name: &'static str, issues: &mut Issues) -> Option<String> {
    match fields.get(name) {
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => Some(text.clone()),
        None | Some(Value::Null) => None,
        Some(other) => {
            issues.push(invalid(name, other));
            None
        }
    }
}

/// Read a numeric field, substituting zero.
///
/// Numbers stored as text (e.g. `"12.50"`) are accepted, since form inputs
/// produce text. Non-finite values are rejected.
pub fn number_field(fields: &Fields, name: &'static str, issues: &mut Issues) -> f64 {
    let value = match fields.get(name) {
        None | Some(Value::Null) => {
            issues.push(DataShapeError::MissingField(name));
            return 0.0;
        }
        Some(value) => value,
    };

    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(number) if number.is_finite() => number,
        _ => {
            issues.push(invalid(name, value));
            0.0
        }
    }
}

/// Read a date field, ignoring any time of day.
///
/// Returns `None` if the field is missing or is not a valid calendar date.
pub fn date_field(fields: &Fields, name: &'static str, issues: &mut Issues) -> Option<Date> {
    match fields.get(name) {
        Some(Value::String(text)) => {
            let date = parse_stored_date(text);

            if date.is_none() {
                issues.push(invalid(name, &Value::String(text.clone())));
            }

            date
        }
        None | Some(Value::Null) => {
            issues.push(DataShapeError::MissingField(name));
            None
        }
        Some(other) => {
            issues.push(invalid(name, other));
            None
        }
    }
}

fn invalid(field: &'static str, value: &Value) -> DataShapeError {
    DataShapeError::InvalidValue {
        field,
        value: value.to_string(),
    }
}
