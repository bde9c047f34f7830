//! Defines the endpoint for listing the transactions recorded against a budget.

use axum::{Json, extract::State};

use crate::{
    Error,
    auth::CurrentUser,
    budget::BudgetId,
    db::lock_connection,
    extract::PathParam,
    transaction::{Transaction, TransactionState, get_transactions_by_budget},
};

/// A route handler for listing the transactions in one of the current user's budgets.
///
/// Responds with 404 when the budget has no transactions, is unknown, or belongs to another
/// user.
pub async fn list_budget_transactions_endpoint(
    State(state): State<TransactionState>,
    CurrentUser(user): CurrentUser,
    PathParam(budget_id): PathParam<BudgetId>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transactions_by_budget(budget_id, user.id, &connection).map(Json)
}
