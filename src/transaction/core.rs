//! Defines the core data models and database queries for transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    budget::{BudgetId, get_budget},
    category::{CategoryId, get_visible_category},
    database_id::DatabaseId,
    user::UserID,
};

pub type TransactionId = DatabaseId;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income recorded against a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The ID of the budget the transaction is recorded against.
    pub budget_id: BudgetId,
}

/// The request body for creating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The category to file the transaction under.
    pub category_id: CategoryId,
    /// When the transaction happened, defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// The budget to record the transaction against.
    pub budget_id: BudgetId,
}

/// The fields of a transaction that can be changed after it is created.
///
/// A field set to `None` is left as is. `Some(0.0)` is a real amount and is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// The new amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new category.
    #[serde(default, alias = "category")]
    pub category_id: Option<CategoryId>,
}

/// The state needed to manage transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            category_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            budget_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(budget_id) REFERENCES budget(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_budget ON \"transaction\"(budget_id)",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id)",
        (),
    )?;

    Ok(())
}

/// Map a row with the columns `id, amount, category_id, date, budget_id` to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        category_id: row.get(2)?,
        date: row.get(3)?,
        budget_id: row.get(4)?,
    })
}

fn check_category_is_visible(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    match get_visible_category(category_id, user_id, connection) {
        Ok(_) => Ok(()),
        Err(Error::NotFound) => Err(Error::InvalidCategory(category_id)),
        Err(error) => Err(error),
    }
}

/// Create a transaction in a budget owned by `user_id`.
///
/// The transaction is dated now if `new_transaction.date` is `None`.
///
/// # Errors
/// Returns:
/// - [Error::BudgetNotFound] if the budget does not exist or belongs to another user,
/// - [Error::InvalidCategory] if the category is neither a system category nor one of the
///   user's custom categories,
/// - [Error::SqlError] if there is an unexpected SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection.unchecked_transaction()?;

    get_budget(new_transaction.budget_id, user_id, &transaction)?;
    check_category_is_visible(new_transaction.category_id, user_id, &transaction)?;

    let date = new_transaction
        .date
        .unwrap_or_else(OffsetDateTime::now_utc);

    let created = transaction
        .prepare(
            "INSERT INTO \"transaction\" (amount, category_id, date, budget_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, category_id, date, budget_id",
        )?
        .query_row(
            (
                new_transaction.amount,
                new_transaction.category_id,
                date,
                new_transaction.budget_id,
            ),
            map_transaction_row,
        )?;

    transaction.commit()?;

    Ok(created)
}

/// Get a transaction if it belongs to a budget owned by `user_id`.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if the transaction does not exist or belongs to another
/// user.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT t.id, t.amount, t.category_id, t.date, t.budget_id
             FROM \"transaction\" t
             INNER JOIN budget b ON t.budget_id = b.id
             WHERE t.id = ?1 AND b.owner_id = ?2",
        )?
        .query_row((id, user_id.as_i64()), map_transaction_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}

/// Get the transactions recorded against a budget owned by `user_id`, oldest first.
///
/// # Errors
/// Returns [Error::NoTransactionsForBudget] if there are no such transactions. An unknown budget,
/// another user's budget and an empty budget are not told apart.
pub fn get_transactions_by_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let transactions = connection
        .prepare(
            "SELECT t.id, t.amount, t.category_id, t.date, t.budget_id
             FROM \"transaction\" t
             INNER JOIN budget b ON t.budget_id = b.id
             WHERE t.budget_id = ?1 AND b.owner_id = ?2
             ORDER BY t.id",
        )?
        .query_map((budget_id, user_id.as_i64()), map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()?;

    if transactions.is_empty() {
        return Err(Error::NoTransactionsForBudget);
    }

    Ok(transactions)
}

/// Apply `patch` to a transaction in a budget owned by `user_id`.
///
/// # Errors
/// Returns:
/// - [Error::TransactionNotFound] if the transaction does not exist or belongs to another user,
/// - [Error::InvalidCategory] if the new category is not visible to the user,
/// - [Error::SqlError] if there is an unexpected SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    patch: &TransactionPatch,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection.unchecked_transaction()?;

    let current = get_transaction(id, user_id, &transaction)?;

    if let Some(category_id) = patch.category_id {
        check_category_is_visible(category_id, user_id, &transaction)?;
    }

    let amount = patch.amount.unwrap_or(current.amount);
    let category_id = patch.category_id.unwrap_or(current.category_id);

    let updated = transaction
        .prepare(
            "UPDATE \"transaction\" SET amount = ?1, category_id = ?2
             WHERE id = ?3
             RETURNING id, amount, category_id, date, budget_id",
        )?
        .query_row((amount, category_id, id), map_transaction_row)?;

    transaction.commit()?;

    Ok(updated)
}

/// Delete a transaction in a budget owned by `user_id`, returning the deleted transaction.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if the transaction does not exist or belongs to another
/// user.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "DELETE FROM \"transaction\"
             WHERE id = ?1 AND budget_id IN (SELECT id FROM budget WHERE owner_id = ?2)
             RETURNING id, amount, category_id, date, budget_id",
        )?
        .query_row((id, user_id.as_i64()), map_transaction_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}
