use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    transaction::{Transaction, map_transaction_row},
    user::UserID,
};

pub type CategoryId = DatabaseId;

/// The categories every user can see, created when the database is initialized.
pub const PREDEFINED_CATEGORIES: [&str; 8] = [
    "Food",
    "Transportation",
    "Rent",
    "Utilities",
    "Entertainment",
    "Healthcare",
    "Savings",
    "Miscellaneous",
];

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an error if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::Validation("category name cannot be empty".to_owned()))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A category for transactions, e.g. 'Food', 'Rent', 'Pet Supplies'.
///
/// System categories have no owner and are shared by all users. Custom categories belong to the
/// user that created them and are only visible to that user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name of the category, unique across all categories.
    pub name: CategoryName,
    /// Whether a user created the category.
    pub is_custom: bool,
    /// The user that created the category, `None` for system categories.
    pub user_id: Option<UserID>,
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT UNIQUE NOT NULL,
            is_custom INTEGER NOT NULL DEFAULT 0,
            user_id INTEGER,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let is_custom = row.get(2)?;
    let raw_user_id: Option<i64> = row.get(3)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        is_custom,
        user_id: raw_user_id.map(UserID::new),
    })
}

/// Insert the [PREDEFINED_CATEGORIES] as system categories, skipping names that already exist.
///
/// Returns the number of categories that were inserted.
///
/// # Errors
/// Returns [Error::SqlError] if there is an unexpected SQL error.
pub fn seed_categories(connection: &Connection) -> Result<usize, Error> {
    let mut statement = connection.prepare(
        "INSERT INTO category (name, is_custom, user_id) VALUES (?1, 0, NULL)
         ON CONFLICT(name) DO NOTHING",
    )?;

    let mut inserted = 0;
    for name in PREDEFINED_CATEGORIES {
        inserted += statement.execute((name,))?;
    }

    Ok(inserted)
}

/// Get the system categories and the custom categories created by `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an unexpected SQL error.
pub fn get_visible_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, is_custom, user_id FROM category
             WHERE user_id IS NULL OR user_id = ?1
             ORDER BY id",
        )?
        .query_map((user_id.as_i64(),), map_category_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Get a category if it is a system category or a custom category created by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or belongs to another user.
pub fn get_visible_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, is_custom, user_id FROM category
             WHERE id = ?1 AND (user_id IS NULL OR user_id = ?2)",
        )?
        .query_row((category_id, user_id.as_i64()), map_category_row)
        .map_err(Error::from)
}

/// Create a custom category owned by `user_id`.
///
/// # Errors
/// Returns:
/// - [Error::DuplicateCategory] if a system category or one of the user's categories already
///   has the name, or the name is taken by another user's category,
/// - [Error::SqlError] if there is an unexpected SQL error.
pub fn create_custom_category(
    user_id: UserID,
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let transaction = connection.unchecked_transaction()?;

    let existing: Option<CategoryId> = transaction
        .prepare(
            "SELECT id FROM category
             WHERE name = ?1 AND (user_id IS NULL OR user_id = ?2)",
        )?
        .query_map((name.as_ref(), user_id.as_i64()), |row| row.get(0))?
        .next()
        .transpose()?;

    if existing.is_some() {
        return Err(Error::DuplicateCategory(name.as_ref().to_owned()));
    }

    let category = transaction
        .prepare(
            "INSERT INTO category (name, is_custom, user_id) VALUES (?1, 1, ?2)
             RETURNING id, name, is_custom, user_id",
        )?
        .query_row((name.as_ref(), user_id.as_i64()), map_category_row)
        .map_err(|error| match Error::from(error) {
            Error::DuplicateCategory(_) => Error::DuplicateCategory(name.as_ref().to_owned()),
            error => error,
        })?;

    transaction.commit()?;

    Ok(category)
}

/// Get the transactions in `category_id` that belong to budgets owned by `user_id`.
///
/// # Errors
/// Returns [Error::NoTransactionsForCategory] if there are no such transactions, which covers
/// both unknown categories and categories the user has not used.
pub fn get_transactions_by_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let transactions = connection
        .prepare(
            "SELECT t.id, t.amount, t.category_id, t.date, t.budget_id
             FROM \"transaction\" t
             INNER JOIN budget b ON t.budget_id = b.id
             WHERE t.category_id = ?1 AND b.owner_id = ?2
             ORDER BY t.id",
        )?
        .query_map((category_id, user_id.as_i64()), map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()?;

    if transactions.is_empty() {
        return Err(Error::NoTransactionsForCategory);
    }

    Ok(transactions)
}
