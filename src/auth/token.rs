//! Issues and validates the signed, expiring bearer tokens used for authentication.
//!
//! Tokens are HS256 JSON Web Tokens whose subject is the user's email. They are stateless: once
//! issued a token stays valid until it expires and there is no way to revoke it early.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::config::AuthConfig;

/// The claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// The email of the user the token was issued to.
    ///
    /// Empty when the claim is absent, so that a missing subject is reported as such rather than
    /// as a malformed token.
    #[serde(default)]
    pub sub: String,
    /// When the token was issued, as a unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// When the token expires, as a unix timestamp.
    pub exp: i64,
}

/// The reasons a token can be rejected.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TokenError {
    /// The signature does not match the token contents or the server secret.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The token is not a well formed JWT.
    #[error("token is malformed")]
    Malformed,

    /// The token expiry is in the past.
    #[error("token has expired")]
    Expired,

    /// The token does not name a subject.
    #[error("token is missing the subject claim")]
    MissingSubject,

    /// The token could not be signed.
    #[error("could not sign token: {0}")]
    Creation(String),
}

/// Signs and verifies session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: Duration,
}

impl TokenService {
    /// Create a token service from the secret and token lifetime in `config`.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_duration: config.token_duration,
        }
    }

    /// How long tokens from this service are valid for.
    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    /// Issue a token for `subject` that expires after the configured token duration.
    ///
    /// # Errors
    ///
    /// Returns [TokenError::Creation] if the token could not be signed.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, OffsetDateTime::now_utc())
    }

    /// Issue a token for `subject` as if it were issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [TokenError::Creation] if the token could not be signed, the token duration is not
    /// positive, or the expiry does not fit in a date.
    pub fn issue_at(&self, subject: &str, issued_at: OffsetDateTime) -> Result<String, TokenError> {
        if !self.token_duration.is_positive() {
            return Err(TokenError::Creation(format!(
                "token duration {} must be positive",
                self.token_duration
            )));
        }

        let expires_at = issued_at
            .checked_add(self.token_duration)
            .ok_or_else(|| {
                TokenError::Creation(format!(
                    "token duration {} is out of range",
                    self.token_duration
                ))
            })?;

        let claims = Claims {
            sub: subject.to_owned(),
            iat: Some(issued_at.unix_timestamp()),
            exp: expires_at.unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| TokenError::Creation(error.to_string()))
    }

    /// Check the signature and expiry of `token` and return its subject.
    ///
    /// A token is accepted up to and including its expiry second.
    ///
    /// # Errors
    ///
    /// Returns a [TokenError] describing why the token was rejected.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|error| {
                match error.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::InvalidSignature
                    }
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => {
                        TokenError::MissingSubject
                    }
                    _ => TokenError::Malformed,
                }
            })?;

        if token_data.claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        Ok(token_data.claims.sub)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("token_duration", &self.token_duration)
            .finish_non_exhaustive()
    }
}
