//! The endpoint for exchanging an email and password for a bearer token.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, auth::TokenService, db::lock_connection, extract::FormBody,
    user::get_user_by_email,
};

/// A bcrypt hash at [PasswordHash::DEFAULT_COST] that log in checks the password against when the
/// email is not registered, so the response takes as long as it does for a wrong password.
const UNKNOWN_USER_HASH: &str = "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm";

/// The state needed to log in a user.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// Signs the token handed back on a successful log in.
    pub token_service: TokenService,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_service: state.token_service.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form-encoded log in request.
///
/// `username` holds the user's email. Other OAuth2 password-flow fields such as `grant_type` and
/// `scope` are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInForm {
    /// The user's email.
    pub username: String,
    /// The user's plaintext password.
    pub password: String,
}

/// The body of a successful log in response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always "bearer".
    pub token_type: String,
}

/// A route handler for logging in a user.
///
/// An unknown email and a wrong password both respond with 401 so that clients cannot tell which
/// emails are registered.
pub async fn log_in(
    State(state): State<LogInState>,
    FormBody(form): FormBody<LogInForm>,
) -> Result<Json<TokenResponse>, Error> {
    let user = {
        let connection = lock_connection(&state.db_connection)?;
        get_user_by_email(&form.username, &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::NotFound) => {
            PasswordHash::new_unchecked(UNKNOWN_USER_HASH).verify(&form.password);
            return Err(Error::InvalidCredentials);
        }
        Err(error) => return Err(error),
    };

    if !user.password_hash.verify(&form.password) {
        tracing::debug!("Wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let access_token = state
        .token_service
        .issue(&user.email)
        .map_err(|error| Error::TokenCreation(error.to_string()))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;

    use crate::{
        PasswordHash,
        auth::TokenService,
        config::AuthConfig,
        test_utils::{db::TEST_PASSWORD, must_create_test_connection, must_create_user},
    };

    use super::{LogInState, TokenResponse, UNKNOWN_USER_HASH, log_in};

    fn get_test_server() -> (TestServer, TokenService) {
        let connection = must_create_test_connection();
        must_create_user(&connection, "a@x.com");
        let token_service = TokenService::new(&AuthConfig::new("foobar"));
        let state = LogInState {
            token_service: token_service.clone(),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route("/log_in", post(log_in))
            .with_state(state);

        (TestServer::new(app), token_service)
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let (server, token_service) = get_test_server();

        let response = server
            .post("/log_in")
            .form(&[("username", "a@x.com"), ("password", TEST_PASSWORD)])
            .await;

        response.assert_status_ok();
        let body: TokenResponse = response.json();
        assert_eq!(body.token_type, "bearer");
        assert_eq!(
            token_service.verify(&body.access_token),
            Ok("a@x.com".to_owned())
        );
    }

    #[tokio::test]
    async fn log_in_ignores_extra_oauth2_fields() {
        let (server, _) = get_test_server();

        server
            .post("/log_in")
            .form(&[
                ("grant_type", "password"),
                ("username", "a@x.com"),
                ("password", TEST_PASSWORD),
                ("scope", ""),
            ])
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let (server, _) = get_test_server();

        server
            .post("/log_in")
            .form(&[("username", "a@x.com"), ("password", "wrong")])
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let (server, _) = get_test_server();

        server
            .post("/log_in")
            .form(&[("username", "nobody@x.com"), ("password", TEST_PASSWORD)])
            .await
            .assert_status_unauthorized();
    }

    #[test]
    fn unknown_user_hash_is_a_bcrypt_hash_at_the_default_cost() {
        let prefix = format!("$2b${}$", PasswordHash::DEFAULT_COST);

        assert!(UNKNOWN_USER_HASH.starts_with(&prefix));
        assert!(bcrypt::verify("anything", UNKNOWN_USER_HASH).is_ok());
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_password() {
        let (server, _) = get_test_server();

        let response = server
            .post("/log_in")
            .form(&[("username", "a@x.com")])
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<serde_json::Value>()["error"].is_string());
    }
}
