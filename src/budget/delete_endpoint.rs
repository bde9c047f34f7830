//! Defines the endpoint for deleting a budget.

use axum::{Json, extract::State};

use super::list_endpoint::BudgetState;
use crate::{
    Error,
    auth::CurrentUser,
    budget::{Budget, BudgetId, delete_budget},
    db::lock_connection,
    extract::PathParam,
};

/// A route handler for deleting a budget owned by the current user, responds with the deleted
/// budget.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    PathParam(budget_id): PathParam<BudgetId>,
) -> Result<Json<Budget>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_budget(budget_id, user.id, &connection)
        .inspect(|_| tracing::info!("User {} deleted budget {budget_id}", user.id))
        .map(Json)
}
