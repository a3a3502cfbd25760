#![allow(missing_docs)]

pub(crate) mod html;

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    auth::{Session, SqliteAuthProvider, UserId},
    db::initialize,
    provider::{Fields, SqliteProvider},
};

pub(crate) use html::assert_valid_html;

/// Turn a JSON object literal into document fields.
#[track_caller]
pub(crate) fn fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub(crate) fn get_test_connection() -> Arc<Mutex<Connection>> {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    Arc::new(Mutex::new(connection))
}

pub(crate) fn get_test_provider() -> SqliteProvider {
    SqliteProvider::new(get_test_connection())
}

/// An auth provider with the cheapest bcrypt cost so tests stay fast.
pub(crate) fn get_test_auth_provider() -> SqliteAuthProvider {
    SqliteAuthProvider::with_cost(get_test_connection(), 4)
}

pub(crate) fn test_session(user_id: &str) -> Session {
    Session {
        user_id: UserId::new(user_id),
        email: EmailAddress::from_str("demo@example.com").unwrap(),
        username: Some("demo".to_owned()),
    }
}
