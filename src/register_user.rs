//! The endpoint for registering a new user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    db::lock_connection,
    extract::JsonBody,
    user::{UserResponse, create_user},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost for hashing the new user's password.
    pub password_cost: u32,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_cost: state.password_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The email to log in with.
    pub email: String,
    /// The plaintext password, only kept long enough to hash it.
    pub password: String,
}

impl RegisterForm {
    fn validate(&self) -> Result<(), Error> {
        if !self.email.contains('@') {
            return Err(Error::Validation(format!(
                "\"{}\" is not a valid email address",
                self.email
            )));
        }

        if self.password.is_empty() {
            return Err(Error::Validation("password cannot be empty".to_owned()));
        }

        Ok(())
    }
}

/// A route handler for creating a new user.
///
/// Responds with the new user's ID and email, or 400 if the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    JsonBody(form): JsonBody<RegisterForm>,
) -> Result<Json<UserResponse>, Error> {
    form.validate()?;

    let password_hash = PasswordHash::new(&form.password, state.password_cost)?;
    let connection = lock_connection(&state.db_connection)?;

    create_user(&form.email, password_hash, &connection)
        .inspect(|user| tracing::info!("Registered user {}", user.id))
        .map(|user| Json(UserResponse::from(&user)))
}
