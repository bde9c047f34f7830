//! Defines the endpoint for listing the current user's budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    budget::{Budget, get_budgets},
    db::lock_connection,
};

/// The state needed to manage budgets.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns the budgets owned by the current user.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Budget>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_budgets(user.id, &connection).map(Json)
}
