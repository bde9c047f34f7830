//! Defines the endpoint for creating a custom category.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::list_endpoint::CategoryState;
use crate::{
    Error,
    auth::CurrentUser,
    category::{Category, CategoryName, create_custom_category},
    db::lock_connection,
    extract::JsonBody,
};

/// The request body for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    /// The name of the new category.
    pub name: String,
}

/// A route handler for creating a custom category owned by the current user.
///
/// Responds with 400 if the name is empty or already used by a system category or one of the
/// user's own categories.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
    JsonBody(new_category): JsonBody<NewCategory>,
) -> Result<Json<Category>, Error> {
    let name = CategoryName::new(&new_category.name)?;
    let connection = lock_connection(&state.db_connection)?;

    create_custom_category(user.id, name, &connection)
        .inspect(|category| {
            tracing::info!("User {} created category {}", user.id, category.id);
        })
        .map(Json)
}
