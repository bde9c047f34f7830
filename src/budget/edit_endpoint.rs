//! Defines the endpoint for replacing a budget's name and amount.

use axum::{Json, extract::State};

use super::list_endpoint::BudgetState;
use crate::{
    Error,
    auth::CurrentUser,
    budget::{Budget, BudgetForm, BudgetId, update_budget},
    db::lock_connection,
    extract::{JsonBody, PathParam},
};

/// A route handler for updating a budget owned by the current user.
///
/// Responds with 404 if the budget does not exist or belongs to someone else.
pub async fn edit_budget_endpoint(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    PathParam(budget_id): PathParam<BudgetId>,
    JsonBody(form): JsonBody<BudgetForm>,
) -> Result<Json<Budget>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_budget(budget_id, user.id, &form, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::IntoResponse};

    use crate::{
        Error,
        auth::CurrentUser,
        budget::{BudgetForm, BudgetState},
        extract::{JsonBody, PathParam},
        test_utils::{
            assert_status_not_found, must_create_budget, must_create_test_connection,
            must_create_user,
        },
    };

    use super::edit_budget_endpoint;

    #[tokio::test]
    async fn updates_own_budget() {
        let connection = must_create_test_connection();
        let user = must_create_user(&connection, "a@x.com");
        let budget = must_create_budget(&connection, user.id, "Groceries", 200.0);
        let state = BudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let updated = edit_budget_endpoint(
            State(state),
            CurrentUser(user),
            PathParam(budget.id),
            JsonBody(BudgetForm {
                name: "Food".to_owned(),
                amount: 250.0,
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(updated.id, budget.id);
        assert_eq!(updated.name, "Food");
        assert_eq!(updated.amount, 250.0);
    }

    #[tokio::test]
    async fn foreign_budget_is_not_found() {
        let connection = must_create_test_connection();
        let owner = must_create_user(&connection, "a@x.com");
        let other = must_create_user(&connection, "b@x.com");
        let budget = must_create_budget(&connection, owner.id, "Groceries", 200.0);
        let state = BudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = edit_budget_endpoint(
            State(state),
            CurrentUser(other),
            PathParam(budget.id),
            JsonBody(BudgetForm {
                name: "Mine now".to_owned(),
                amount: 1.0,
            }),
        )
        .await;

        assert_eq!(result.as_ref().err(), Some(&Error::BudgetNotFound));
        assert_status_not_found(&result.into_response());
    }
}
