//! Defines the endpoint for listing the transactions in a category.

use axum::{Json, extract::State};

use super::list_endpoint::CategoryState;
use crate::{
    Error,
    auth::CurrentUser,
    category::{CategoryId, get_transactions_by_category},
    db::lock_connection,
    extract::PathParam,
    transaction::Transaction,
};

/// A route handler for listing the current user's transactions in a category.
///
/// Responds with 404 when there are no such transactions.
pub async fn list_category_transactions_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
    PathParam(category_id): PathParam<CategoryId>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transactions_by_category(category_id, user.id, &connection).map(Json)
}
