//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, PasswordHash, auth::TokenService, config::AuthConfig, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Issues and verifies the bearer tokens used for authentication.
    pub token_service: TokenService,

    /// The bcrypt cost used when hashing the passwords of new users.
    pub password_cost: u32,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models and
    /// the predefined categories.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, auth_config: &AuthConfig) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            token_service: TokenService::new(auth_config),
            password_cost: PasswordHash::DEFAULT_COST,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Use `password_cost` when hashing new passwords.
    pub fn with_password_cost(mut self, password_cost: u32) -> Self {
        self.password_cost = password_cost;
        self
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{PasswordHash, config::AuthConfig};

    use super::AppState;

    #[test]
    fn new_initializes_database() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, &AuthConfig::new("secret")).unwrap();

        let category_count: i64 = state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM category", [], |row| row.get(0))
            .unwrap();
        assert_eq!(category_count, 8);
        assert_eq!(state.password_cost, PasswordHash::DEFAULT_COST);
    }

    #[test]
    fn with_password_cost_overrides_default() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), &AuthConfig::new("s"))
            .unwrap()
            .with_password_cost(4);

        assert_eq!(state.password_cost, 4);
    }
}
