//! Application router configuration.
//!
//! Every route other than the root, registration and log in resolves the caller from a bearer
//! token through the [crate::auth::CurrentUser] extractor.

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    budget::{
        create_budget_endpoint, delete_budget_endpoint, edit_budget_endpoint,
        list_budgets_endpoint,
    },
    category::{
        create_category_endpoint, list_categories_endpoint, list_category_transactions_endpoint,
    },
    endpoints,
    log_in::log_in,
    register_user::register_user,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_budget_transactions_endpoint,
    },
    user::get_current_user,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::ME, get(get_current_user))
        .route(
            endpoints::BUDGETS,
            post(create_budget_endpoint).get(list_budgets_endpoint),
        )
        .route(
            endpoints::BUDGET,
            put(edit_budget_endpoint).delete(delete_budget_endpoint),
        )
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION,
            get(list_budget_transactions_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY_TRANSACTIONS,
            get(list_category_transactions_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_root() -> Json<Value> {
    Json(json!({ "message": "CFO Assistant API is running!" }))
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
