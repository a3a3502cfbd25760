//! The transaction store adapter: a live feed of a user's transactions plus
//! add, update and delete.

use std::cmp::Ordering;

use crate::{
    Alert, Error, Session,
    provider::{CollectionPath, Document, FromDocument, PersistenceProvider},
    store::{Decoder, Feed},
    transaction::{Transaction, TransactionForm, TransactionId},
};

/// The order of the transactions in a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionOrder {
    /// The order the provider delivers them in, i.e. commit order.
    #[default]
    Stored,
    /// Latest date first. Transactions with an invalid date come last.
    NewestFirst,
}

/// Reads and writes the signed in user's transactions.
pub struct TransactionStore<'a, P: ?Sized> {
    provider: &'a P,
    path: CollectionPath,
}

impl<'a, P> TransactionStore<'a, P>
where
    P: PersistenceProvider + ?Sized,
{
    /// Create a store for the transactions of the user in `session`.
    pub fn new(provider: &'a P, session: &Session) -> Self {
        Self {
            provider,
            path: CollectionPath::transactions(&session.user_id),
        }
    }

    /// Subscribe to the live list of transactions.
    pub async fn subscribe(&self, order: TransactionOrder) -> Result<Feed<Transaction>, Error> {
        let subscription = self.provider.subscribe(&self.path).await?;

        let decode: Decoder<Transaction> = match order {
            TransactionOrder::Stored => Transaction::from_snapshot,
            TransactionOrder::NewestFirst => decode_newest_first,
        };

        Ok(Feed::new(subscription, decode))
    }

    /// Validate `form` and store it as a new transaction.
    ///
    /// Nothing is sent to the provider if the form is invalid.
    pub async fn add(&self, form: &TransactionForm) -> Result<(TransactionId, Alert), Error> {
        let record = form.validate()?;
        let id = self.provider.create(&self.path, record.to_fields()).await?;

        tracing::info!("Added transaction {id}");

        Ok((id, Alert::added("Transaction")))
    }

    /// Validate `form` and replace the transaction `id` with it.
    pub async fn update(&self, id: &TransactionId, form: &TransactionForm) -> Result<Alert, Error> {
        let record = form.validate()?;
        self.provider
            .update(&self.path, id, record.to_fields())
            .await?;

        tracing::info!("Updated transaction {id}");

        Ok(Alert::updated("Transaction"))
    }

    /// Remove the transaction `id`. The caller is responsible for confirming
    /// the deletion with the user.
    pub async fn delete(&self, id: &TransactionId) -> Result<Alert, Error> {
        self.provider.delete(&self.path, id).await?;

        tracing::info!("Deleted transaction {id}");

        Ok(Alert::deleted("Transaction"))
    }
}

fn decode_newest_first(documents: &[Document]) -> Vec<Transaction> {
    let mut transactions = Transaction::from_snapshot(documents);
    transactions.sort_by(|a, b| match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    transactions
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error, Field, ProviderError,
        provider::{CollectionPath, PersistenceProvider},
        test_utils::{get_test_provider, test_session},
        transaction::{TransactionForm, TransactionId, TransactionOrder, TransactionStore},
    };

    fn form(category: &str, date: &str) -> TransactionForm {
        TransactionForm {
            kind: "expense".to_owned(),
            category: category.to_owned(),
            amount: "10".to_owned(),
            date: date.to_owned(),
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn feed_updates_after_add() {
        let provider = get_test_provider();
        let session = test_session("user-1");
        let store = TransactionStore::new(&provider, &session);
        let mut feed = store.subscribe(TransactionOrder::Stored).await.unwrap();
        assert!(feed.current().is_empty());

        let (id, alert) = store.add(&form("Food", "2024-01-10")).await.unwrap();

        let transactions = feed.changed().await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, id);
        assert_eq!(transactions[0].date, Some(date!(2024 - 01 - 10)));
        assert_eq!(alert.message, "Transaction has been added.");
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_provider() {
        let provider = get_test_provider();
        let session = test_session("user-1");
        let store = TransactionStore::new(&provider, &session);
        let feed = store.subscribe(TransactionOrder::Stored).await.unwrap();

        let result = store.add(&form("", "2024-01-10")).await;

        let Err(Error::Validation(errors)) = result else {
            panic!("want validation error");
        };
        assert!(errors.get(Field::Category).is_some());
        assert!(feed.current().is_empty());
    }

    #[tokio::test]
    async fn newest_first_order() {
        let provider = get_test_provider();
        let session = test_session("user-1");
        let store = TransactionStore::new(&provider, &session);
        store.add(&form("Old", "2023-06-01")).await.unwrap();
        store.add(&form("New", "2024-06-01")).await.unwrap();
        provider
            .create(
                &CollectionPath::transactions(&session.user_id),
                crate::test_utils::fields(serde_json::json!({"category": "Broken", "date": "?"})),
            )
            .await
            .unwrap();

        let feed = store.subscribe(TransactionOrder::NewestFirst).await.unwrap();
        let categories: Vec<String> = feed
            .current()
            .into_iter()
            .map(|transaction| transaction.category)
            .collect();

        assert_eq!(categories, ["New", "Old", "Broken"]);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let provider = get_test_provider();
        let session = test_session("user-1");
        let store = TransactionStore::new(&provider, &session);
        let (id, _) = store.add(&form("Food", "2024-01-10")).await.unwrap();
        let mut feed = store.subscribe(TransactionOrder::Stored).await.unwrap();

        let alert = store
            .update(&id, &form("Groceries", "2024-01-11"))
            .await
            .unwrap();
        assert_eq!(alert.title, "Updated!");
        assert_eq!(feed.changed().await.unwrap()[0].category, "Groceries");

        let alert = store.delete(&id).await.unwrap();
        assert_eq!(alert.title, "Deleted!");
        assert!(feed.changed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_transaction_reports_provider_error() {
        let provider = get_test_provider();
        let session = test_session("user-1");
        let store = TransactionStore::new(&provider, &session);

        let result = store.delete(&TransactionId::new("missing")).await;

        assert_eq!(result, Err(Error::Provider(ProviderError::NotFound)));
    }
}
