use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    PasswordHash, UserID,
    auth::create_user,
    db::initialize,
};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user named `username` with the email `{username}@example.com`.
#[track_caller]
pub(crate) fn create_test_user(username: &str, connection: &Connection) -> UserID {
    let email = EmailAddress::from_str(&format!("{username}@example.com"))
        .expect("Could not create test email");

    create_user(
        username,
        email,
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}
