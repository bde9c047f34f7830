use rusqlite::Connection;

use crate::{
    PasswordHash,
    budget::{Budget, BudgetForm, create_budget},
    db::initialize,
    user::{User, UserID, create_user},
};

/// The password for every user made by [must_create_user].
pub(crate) const TEST_PASSWORD: &str = "hunter2";

/// The lowest cost bcrypt accepts, keeps hashing fast in tests.
pub(crate) const TEST_PASSWORD_COST: u32 = 4;

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

#[track_caller]
pub(crate) fn must_create_user(connection: &Connection, email: &str) -> User {
    let password_hash = PasswordHash::new(TEST_PASSWORD, TEST_PASSWORD_COST)
        .expect("Could not hash test password");

    create_user(email, password_hash, connection).expect("Could not create test user")
}

#[track_caller]
pub(crate) fn must_create_budget(
    connection: &Connection,
    owner_id: UserID,
    name: &str,
    amount: f64,
) -> Budget {
    create_budget(
        owner_id,
        &BudgetForm {
            name: name.to_owned(),
            amount,
        },
        connection,
    )
    .expect("Could not create test budget")
}
