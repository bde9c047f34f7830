//! Resolves the bearer token on a request to the user that made it.

use std::sync::{Arc, Mutex};

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::TokenService,
    db::lock_connection,
    user::{User, get_user_by_email},
};

/// The state needed to resolve a bearer token to a user.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Verifies the bearer token.
    pub token_service: TokenService,
    /// The database connection for looking up the token's subject.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_service: state.token_service.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Map `token` to the user it was issued to.
///
/// This is the only way a request becomes authenticated. Nothing is cached, every call verifies
/// the token and looks the user up again.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if the token is invalid or expired, or if its subject does not
/// belong to a registered user (e.g., the user was deleted after the token was issued).
/// Other store errors are passed through.
pub fn resolve_identity(
    token: &str,
    token_service: &TokenService,
    connection: &Connection,
) -> Result<User, Error> {
    let subject = token_service.verify(token).map_err(|error| {
        tracing::debug!("Rejected bearer token: {error}");
        Error::Unauthorized
    })?;

    match get_user_by_email(&subject, connection) {
        Ok(user) => Ok(user),
        Err(Error::NotFound) => {
            tracing::debug!("Bearer token subject is not a registered user.");
            Err(Error::Unauthorized)
        }
        Err(error) => Err(error),
    }
}

/// The authenticated user making a request.
///
/// Use this as a handler argument to require a valid `Authorization: Bearer <token>` header.
/// Requests without one are rejected with 401 before the handler runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                tracing::debug!("Request is missing a bearer token.");
                Error::Unauthorized
            })?;

        let auth_state = AuthState::from_ref(state);
        let connection = lock_connection(&auth_state.db_connection)?;

        resolve_identity(bearer.token(), &auth_state.token_service, &connection).map(CurrentUser)
    }
}
