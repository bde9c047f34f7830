//! Budgets owned by a single user.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Budget, BudgetForm, BudgetId, create_budget, create_budget_table, delete_budget, get_budget,
    get_budgets, update_budget,
};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;
pub use edit_endpoint::edit_budget_endpoint;
pub use list_endpoint::{BudgetState, list_budgets_endpoint};
