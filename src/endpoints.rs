//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/budgets/{budget_id}', use [format_endpoint].

/// The root route which reports that the API is up.
pub const ROOT: &str = "/";
/// The route for registering a new user.
pub const REGISTER: &str = "/users/register";
/// The route for exchanging credentials for a bearer token.
pub const LOG_IN: &str = "/users/login";
/// The route for getting the current user.
pub const ME: &str = "/users/me";
/// The route to create and list budgets.
pub const BUDGETS: &str = "/budgets/";
/// The route to update or delete a single budget.
pub const BUDGET: &str = "/budgets/{budget_id}";
/// The route to create a transaction.
pub const TRANSACTIONS: &str = "/transactions/";
/// The route to list a budget's transactions (GET, the ID is a budget ID) or to update and delete
/// a single transaction (PUT and DELETE, the ID is a transaction ID).
///
/// axum does not allow two routes with the same shape but different parameter names, so both
/// share `{id}`.
pub const TRANSACTION: &str = "/transactions/{id}";
/// The route to create and list categories.
pub const CATEGORIES: &str = "/categories/";
/// The route to list the transactions in a category.
pub const CATEGORY_TRANSACTIONS: &str = "/categories/{category_id}/transactions";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
