//! Defines the endpoint for creating a budget.

use axum::{Json, extract::State};

use super::list_endpoint::BudgetState;
use crate::{
    Error,
    auth::CurrentUser,
    budget::{Budget, BudgetForm, create_budget},
    db::lock_connection,
    extract::JsonBody,
};

/// A route handler for creating a budget owned by the current user.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    JsonBody(form): JsonBody<BudgetForm>,
) -> Result<Json<Budget>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    create_budget(user.id, &form, &connection)
        .inspect(|budget| tracing::info!("User {} created budget {}", user.id, budget.id))
        .map(Json)
}
