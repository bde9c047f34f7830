//! Defines the endpoint for deleting a transaction.

use axum::{Json, extract::State};

use crate::{
    Error,
    auth::CurrentUser,
    db::lock_connection,
    extract::PathParam,
    transaction::{Transaction, TransactionId, TransactionState, delete_transaction},
};

/// A route handler for deleting one of the current user's transactions, responds with the
/// deleted transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    CurrentUser(user): CurrentUser,
    PathParam(transaction_id): PathParam<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_transaction(transaction_id, user.id, &connection).map(Json)
}
