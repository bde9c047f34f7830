//! Configuration for signing and validating session tokens.

use time::Duration;

/// How long a session token is valid for unless configured otherwise.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::minutes(30);

/// The settings the token service is constructed from.
///
/// This is built once at startup and passed into [crate::TokenService::new], so tests can create
/// services with their own secret and token lifetime.
#[derive(Clone)]
pub struct AuthConfig {
    /// The server-held secret used to sign tokens.
    pub secret: String,
    /// How long a token is valid for after it is issued.
    pub token_duration: Duration,
}

impl AuthConfig {
    /// Create a config with `secret` and the [DEFAULT_TOKEN_DURATION].
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_owned(),
            token_duration: DEFAULT_TOKEN_DURATION,
        }
    }

    /// Replace the token lifetime.
    pub fn with_token_duration(mut self, token_duration: Duration) -> Self {
        self.token_duration = token_duration;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"********")
            .field("token_duration", &self.token_duration)
            .finish()
    }
}
