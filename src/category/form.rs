//! The add/edit category form, with checks for duplicate names.

use serde_json::json;

use crate::{
    Error, Field, FieldErrors,
    category::{Category, CategoryId, CategoryName},
    provider::Fields,
    transaction::TransactionKind,
};

/// The raw inputs of the add/edit category dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    /// The category name.
    pub name: String,
    /// "income" or "expense".
    pub kind: String,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: TransactionKind::Expense.as_str().to_owned(),
        }
    }
}

impl CategoryForm {
    /// A form pre-filled with an existing category, for editing.
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.to_string(),
            kind: category.kind.as_str().to_owned(),
        }
    }

    /// Check the form against the user's `existing` categories.
    ///
    /// Names must be unique ignoring case. When editing, pass the ID of the
    /// category being edited as `editing` so it does not clash with itself.
    pub fn validate(
        &self,
        existing: &[Category],
        editing: Option<&CategoryId>,
    ) -> Result<NewCategory, Error> {
        let mut errors = FieldErrors::new();

        let name = match CategoryName::new(&self.name) {
            Ok(name) => Some(name),
            Err(_) => {
                errors.push(Field::Name, "Category name cannot be empty");
                None
            }
        };

        if let Some(name) = &name {
            let is_duplicate = existing
                .iter()
                .filter(|category| Some(&category.id) != editing)
                .any(|category| category.name.matches(name.as_ref()));

            if is_duplicate {
                errors.push(Field::Name, "A category with this name already exists.");
            }
        }

        let kind = TransactionKind::parse(&self.kind);
        if kind.is_none() {
            errors.push(Field::Type, "Type must be income or expense.");
        }

        match (name, kind) {
            (Some(name), Some(kind)) if errors.is_empty() => Ok(NewCategory { name, kind }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

/// A category form that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The trimmed, unique name.
    pub name: CategoryName,
    /// Income or expense.
    pub kind: TransactionKind,
}

impl NewCategory {
    /// The document fields for this category.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".to_owned(), json!(self.name.as_ref()));
        fields.insert("type".to_owned(), json!(self.kind.as_str()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, Field,
        category::{Category, CategoryForm, CategoryId, CategoryName},
        transaction::TransactionKind,
    };

    fn existing() -> Vec<Category> {
        vec![Category {
            id: CategoryId::new("c1"),
            name: CategoryName::new_unchecked("Food"),
            kind: TransactionKind::Expense,
        }]
    }

    fn form(name: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_owned(),
            ..CategoryForm::default()
        }
    }

    #[test]
    fn rejects_duplicate_name_ignoring_case() {
        let Err(Error::Validation(errors)) = form(" FOOD ").validate(&existing(), None) else {
            panic!("want validation error");
        };

        assert_eq!(
            errors.get(Field::Name),
            Some("A category with this name already exists.")
        );
    }

    #[test]
    fn editing_may_keep_its_own_name() {
        let id = CategoryId::new("c1");

        let category = form("food").validate(&existing(), Some(&id)).unwrap();

        assert_eq!(category.name.as_ref(), "food");
        assert_eq!(category.kind, TransactionKind::Expense);
    }

    #[test]
    fn rejects_blank_name_and_bad_type() {
        let form = CategoryForm {
            name: "  ".to_owned(),
            kind: "refund".to_owned(),
        };

        let Err(Error::Validation(errors)) = form.validate(&[], None) else {
            panic!("want validation error");
        };

        assert_eq!(errors.get(Field::Name), Some("Category name cannot be empty"));
        assert_eq!(errors.get(Field::Type), Some("Type must be income or expense."));
    }
}
