//! Transactions recorded against budgets.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the request bodies for creating and updating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionId, TransactionPatch, TransactionState,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions_by_budget, map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_budget_transactions_endpoint;
