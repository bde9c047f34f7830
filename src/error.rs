//! Defines the app level error type and its conversion into JSON error responses.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::category::CategoryId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a request with a missing or malformed field.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The category ID used to create or update a transaction does not refer
    /// to a category visible to the user.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The email used for registration already belongs to a user.
    #[error("email already registered")]
    DuplicateEmail,

    /// A category with the same name already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// The user provided an invalid combination of email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer token was missing, invalid or expired, or its subject no
    /// longer refers to a registered user.
    #[error("could not validate credentials")]
    Unauthorized,

    /// The budget does not exist or belongs to another user.
    #[error("budget not found")]
    BudgetNotFound,

    /// The transaction does not exist or belongs to another user's budget.
    #[error("transaction not found")]
    TransactionNotFound,

    /// The budget has no transactions, or is not visible to the user.
    #[error("no transactions found for this budget")]
    NoTransactionsForBudget,

    /// The category has no transactions visible to the user.
    #[error("no transactions found for this category")]
    NoTransactionsForCategory,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A session token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
            {
                Error::DuplicateCategory(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidCategory(_)
            | Error::DuplicateEmail
            | Error::DuplicateCategory(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::BudgetNotFound
            | Error::TransactionNotFound
            | Error::NoTransactionsForBudget
            | Error::NoTransactionsForCategory
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Error::DuplicateEmail => "Email already registered.".to_owned(),
            Error::DuplicateCategory(_) => "Category already exists.".to_owned(),
            Error::InvalidCredentials => "Invalid credentials.".to_owned(),
            Error::Unauthorized => "Could not validate credentials.".to_owned(),
            Error::BudgetNotFound => "Budget not found.".to_owned(),
            Error::TransactionNotFound => "Transaction not found.".to_owned(),
            Error::NoTransactionsForBudget => "No transactions found for this budget.".to_owned(),
            Error::NoTransactionsForCategory => {
                "No transactions found for this category.".to_owned()
            }
            Error::NotFound => "The requested resource could not be found.".to_owned(),
            Error::Validation(_) | Error::InvalidCategory(_) => self.to_string(),
            // Internal details are for the server logs only.
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => "Internal server error.".to_owned(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        let body = Json(json!({
            "error": self.client_message(),
        }));

        let mut response = (status, body).into_response();

        if self == Error::Unauthorized {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}
