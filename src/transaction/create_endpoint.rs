//! Defines the endpoint for creating a transaction.

use axum::{Json, extract::State};

use crate::{
    Error,
    auth::CurrentUser,
    db::lock_connection,
    extract::JsonBody,
    transaction::{NewTransaction, Transaction, TransactionState, create_transaction},
};

/// A route handler for creating a transaction in one of the current user's budgets.
///
/// Responds with 404 if the budget is not the user's and 400 if the category is not visible to
/// the user.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    CurrentUser(user): CurrentUser,
    JsonBody(new_transaction): JsonBody<NewTransaction>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    create_transaction(user.id, &new_transaction, &connection)
        .inspect(|transaction| {
            tracing::debug!(
                "Created transaction {} in budget {}",
                transaction.id,
                transaction.budget_id
            )
        })
        .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use time::macros::datetime;

    use crate::{
        Error,
        auth::CurrentUser,
        extract::JsonBody,
        test_utils::{must_create_budget, must_create_test_connection, must_create_user},
        transaction::{NewTransaction, TransactionState},
    };

    use super::create_transaction_endpoint;

    #[tokio::test]
    async fn creates_transaction_in_own_budget() {
        let connection = must_create_test_connection();
        let user = must_create_user(&connection, "a@x.com");
        let budget = must_create_budget(&connection, user.id, "Groceries", 200.0);
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let transaction = create_transaction_endpoint(
            State(state),
            CurrentUser(user),
            JsonBody(NewTransaction {
                amount: -20.0,
                category_id: 1,
                date: Some(datetime!(2025-06-01 12:00 UTC)),
                budget_id: budget.id,
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(transaction.budget_id, budget.id);
        assert_eq!(transaction.amount, -20.0);
    }

    #[tokio::test]
    async fn create_in_foreign_budget_is_not_found() {
        let connection = must_create_test_connection();
        let owner = must_create_user(&connection, "a@x.com");
        let other = must_create_user(&connection, "b@x.com");
        let budget = must_create_budget(&connection, owner.id, "Groceries", 200.0);
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = create_transaction_endpoint(
            State(state),
            CurrentUser(other),
            JsonBody(NewTransaction {
                amount: -20.0,
                category_id: 1,
                date: None,
                budget_id: budget.id,
            }),
        )
        .await;

        assert_eq!(result.as_ref().err(), Some(&Error::BudgetNotFound));
        assert_eq!(result.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_with_unknown_category_is_bad_request() {
        let connection = must_create_test_connection();
        let user = must_create_user(&connection, "a@x.com");
        let budget = must_create_budget(&connection, user.id, "Groceries", 200.0);
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = create_transaction_endpoint(
            State(state),
            CurrentUser(user),
            JsonBody(NewTransaction {
                amount: -20.0,
                category_id: 9999,
                date: None,
                budget_id: budget.id,
            }),
        )
        .await;

        assert_eq!(result.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
