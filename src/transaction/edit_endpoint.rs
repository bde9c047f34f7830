//! Defines the endpoint for partially updating a transaction.

use axum::{Json, extract::State};

use crate::{
    Error,
    auth::CurrentUser,
    db::lock_connection,
    extract::{JsonBody, PathParam},
    transaction::{
        Transaction, TransactionId, TransactionPatch, TransactionState, update_transaction,
    },
};

/// A route handler for changing the amount and/or category of one of the current user's
/// transactions.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    CurrentUser(user): CurrentUser,
    PathParam(transaction_id): PathParam<TransactionId>,
    JsonBody(patch): JsonBody<TransactionPatch>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_transaction(transaction_id, user.id, &patch, &connection).map(Json)
}
