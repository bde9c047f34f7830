use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, user::UserID};

pub type BudgetId = DatabaseId;

/// An amount of money set aside by a user for some purpose, e.g. 'Groceries'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The id for the budget.
    pub id: BudgetId,
    /// A name describing what the budget is for.
    pub name: String,
    /// The amount budgeted, may be negative.
    pub amount: f64,
    /// The user that created the budget.
    pub owner_id: UserID,
}

/// The fields a client provides when creating or replacing a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetForm {
    /// A name describing what the budget is for.
    pub name: String,
    /// The amount budgeted.
    pub amount: f64,
}

pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            owner_id INTEGER NOT NULL,
            FOREIGN KEY(owner_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let amount = row.get(2)?;
    let raw_owner_id = row.get(3)?;

    Ok(Budget {
        id,
        name,
        amount,
        owner_id: UserID::new(raw_owner_id),
    })
}

/// Converts "no rows" into [Error::BudgetNotFound] so that a foreign budget and a missing one
/// look the same to the caller.
fn budget_not_found(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => Error::BudgetNotFound,
        error => error.into(),
    }
}

/// Create a budget owned by `owner_id`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an unexpected SQL error.
pub fn create_budget(
    owner_id: UserID,
    form: &BudgetForm,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "INSERT INTO budget (name, amount, owner_id) VALUES (?1, ?2, ?3)
             RETURNING id, name, amount, owner_id",
        )?
        .query_row(
            (&form.name, form.amount, owner_id.as_i64()),
            map_budget_row,
        )
        .map_err(Error::from)
}

/// Get the budgets owned by `owner_id`, oldest first.
///
/// An empty list is returned if the user has no budgets.
///
/// # Errors
/// Returns [Error::SqlError] if there is an unexpected SQL error.
pub fn get_budgets(owner_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, owner_id FROM budget WHERE owner_id = ?1 ORDER BY id",
        )?
        .query_map((owner_id.as_i64(),), map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Get a budget by its id if it is owned by `owner_id`.
///
/// # Errors
/// Returns [Error::BudgetNotFound] if the budget does not exist or belongs to another user.
pub fn get_budget(
    id: BudgetId,
    owner_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare("SELECT id, name, amount, owner_id FROM budget WHERE id = ?1 AND owner_id = ?2")?
        .query_row((id, owner_id.as_i64()), map_budget_row)
        .map_err(budget_not_found)
}

/// Replace the name and amount of a budget owned by `owner_id`.
///
/// # Errors
/// Returns [Error::BudgetNotFound] if the budget does not exist or belongs to another user.
pub fn update_budget(
    id: BudgetId,
    owner_id: UserID,
    form: &BudgetForm,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "UPDATE budget SET name = ?1, amount = ?2
             WHERE id = ?3 AND owner_id = ?4
             RETURNING id, name, amount, owner_id",
        )?
        .query_row(
            (&form.name, form.amount, id, owner_id.as_i64()),
            map_budget_row,
        )
        .map_err(budget_not_found)
}

/// Delete a budget owned by `owner_id` and its transactions, returning the deleted budget.
///
/// # Errors
/// Returns [Error::BudgetNotFound] if the budget does not exist, was already deleted, or
/// belongs to another user.
pub fn delete_budget(
    id: BudgetId,
    owner_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "DELETE FROM budget WHERE id = ?1 AND owner_id = ?2
             RETURNING id, name, amount, owner_id",
        )?
        .query_row((id, owner_id.as_i64()), map_budget_row)
        .map_err(budget_not_found)
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use crate::user::create_user_table;

    use super::create_budget_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_user_table(&connection).unwrap();

        assert_eq!(Ok(()), create_budget_table(&connection));
    }
}
