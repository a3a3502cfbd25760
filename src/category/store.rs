//! Reading and writing the signed-in user's categories.

use crate::{
    Alert, Error, Session,
    category::{Category, CategoryForm, CategoryId},
    provider::{CollectionPath, Document, FromDocument, PersistenceProvider},
    store::Feed,
};

/// Reads and writes the signed in user's categories.
pub struct CategoryStore<'a, P: ?Sized> {
    provider: &'a P,
    path: CollectionPath,
}

impl<'a, P> CategoryStore<'a, P>
where
    P: PersistenceProvider + ?Sized,
{
    /// Create a store for the categories of the user in `session`.
    pub fn new(provider: &'a P, session: &Session) -> Self {
        Self {
            provider,
            path: CollectionPath::categories(&session.user_id),
        }
    }

    /// Subscribe to the live list of categories, ordered by name.
    pub async fn subscribe(&self) -> Result<Feed<Category>, Error> {
        let subscription = self.provider.subscribe(&self.path).await?;

        Ok(Feed::new(subscription, decode_by_name))
    }

    /// Validate `form` against `existing` and store it as a new category.
    ///
    /// `existing` should be the latest list delivered by the feed.
    pub async fn add(
        &self,
        form: &CategoryForm,
        existing: &[Category],
    ) -> Result<(CategoryId, Alert), Error> {
        let record = form.validate(existing, None)?;
        let id = self.provider.create(&self.path, record.to_fields()).await?;

        tracing::info!("Added category {id}");

        Ok((id, Alert::added("Category")))
    }

    /// Validate `form` against `existing` and replace the category `id` with it.
    pub async fn update(
        &self,
        id: &CategoryId,
        form: &CategoryForm,
        existing: &[Category],
    ) -> Result<Alert, Error> {
        let record = form.validate(existing, Some(id))?;
        self.provider
            .update(&self.path, id, record.to_fields())
            .await?;

        tracing::info!("Updated category {id}");

        Ok(Alert::updated("Category"))
    }

    /// Remove the category `id`. Transactions keep their category label.
    pub async fn delete(&self, id: &CategoryId) -> Result<Alert, Error> {
        self.provider.delete(&self.path, id).await?;

        tracing::info!("Deleted category {id}");

        Ok(Alert::deleted("Category"))
    }
}

fn decode_by_name(documents: &[Document]) -> Vec<Category> {
    let mut categories = Category::from_snapshot(documents);
    categories.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
    categories
}
