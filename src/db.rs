//! Creating the database schema.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{auth::create_auth_tables, provider::create_document_table};

/// Create the tables used by [crate::SqliteProvider] and
/// [crate::SqliteAuthProvider] if they do not exist yet.
///
/// # Errors
/// Returns an error if the database is locked or a statement fails. No tables
/// are created in that case.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_auth_tables(&transaction)?;
    create_document_table(&transaction)?;

    transaction.commit()?;
    tracing::debug!("database schema is ready");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::db::initialize;

    fn table_names(connection: &Connection) -> Vec<String> {
        let mut statement = connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();

        statement
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|name| name.unwrap())
            .filter(|name: &String| !name.starts_with("sqlite_"))
            .collect()
    }

    #[test]
    fn creates_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(
            table_names(&connection),
            ["document", "password_reset_request", "user"]
        );
    }

    #[test]
    fn can_initialize_twice() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert!(initialize(&connection).is_ok());
    }
}
