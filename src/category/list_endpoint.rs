//! Defines the endpoint for listing the categories visible to a user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    category::{Category, get_visible_categories},
    db::lock_connection,
};

/// The state needed to list and create categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns the system categories and the user's custom categories.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_visible_categories(user.id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;

    use crate::{
        auth::CurrentUser,
        category::{CategoryName, PREDEFINED_CATEGORIES, create_custom_category},
        test_utils::{must_create_test_connection, must_create_user},
    };

    use super::{CategoryState, list_categories_endpoint};

    #[tokio::test]
    async fn lists_system_and_own_categories() {
        let connection = must_create_test_connection();
        let user = must_create_user(&connection, "a@x.com");
        let other = must_create_user(&connection, "b@x.com");
        let own =
            create_custom_category(user.id, CategoryName::new_unchecked("Pets"), &connection)
                .unwrap();
        create_custom_category(other.id, CategoryName::new_unchecked("Golf"), &connection)
            .unwrap();
        let state = CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let categories = list_categories_endpoint(State(state), CurrentUser(user))
            .await
            .unwrap()
            .0;

        assert_eq!(categories.len(), PREDEFINED_CATEGORIES.len() + 1);
        assert_eq!(categories.last(), Some(&own));
    }
}
