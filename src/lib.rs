//! CFO Assistant is the backend for a personal finance tracker.
//!
//! Users register and log in with an email and password, then manage budgets, the transactions
//! recorded against those budgets, and the categories the transactions are filed under.
//!
//! This library provides a JSON REST API. Clients authenticate with a signed bearer token issued
//! at log in, and every budget, transaction and custom category is only visible to the user that
//! owns it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod budget;
mod category;
mod config;
mod database_id;
mod db;
mod endpoints;
mod error;
mod extract;
mod log_in;
mod logging;
mod password;
mod register_user;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{TokenError, TokenService};
pub use config::{AuthConfig, DEFAULT_TOKEN_DURATION};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::PasswordHash;
pub use routing::build_router;
pub use user::{User, UserID, create_user, get_user_by_email, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
