//! Database initialization and access to the shared connection.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    budget::create_budget_table,
    category::{create_category_table, seed_categories},
    transaction::create_transaction_table,
    user::create_user_table,
};

/// Create the application tables if they do not exist and seed the predefined categories.
///
/// Foreign key enforcement is switched on for `connection`, which is needed for the cascading
/// deletes between users, categories, budgets and transactions.
///
/// # Errors
/// Returns an error if any of the tables could not be created or the categories could not be
/// seeded. Nothing is committed in that case.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must be set first.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_transaction_table(&transaction)?;
    seed_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the lock on the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the mutex has been poisoned.
pub fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::Error;

    use super::{initialize, lock_connection};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(initialize(&connection), Ok(()));
        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let foreign_keys: bool = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert!(foreign_keys);
    }

    #[test]
    fn lock_connection_fails_on_poisoned_mutex() {
        let db_connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let poisoner = db_connection.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            lock_connection(&db_connection),
            Err(Error::DatabaseLockError)
        ));
    }
}
