//! Request extractors that reject bad input with the app's JSON error body.
//!
//! These wrap axum's `Json`, `Form` and `Path` extractors. A rejection is turned into
//! [Error::Validation], so a malformed body or path responds with 400 and `{"error": ...}` like
//! every other client error.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{FormRejection, JsonRejection, PathRejection},
};

use crate::Error;

/// A JSON request body deserialized into `T`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// A form-encoded request body deserialized into `T`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(Error))]
pub struct FormBody<T>(pub T);

/// A path parameter deserialized into `T`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {rejection}");
        Error::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for Error {
    fn from(rejection: FormRejection) -> Self {
        tracing::debug!("Rejected form body: {rejection}");
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {rejection}");
        Error::Validation(rejection.body_text())
    }
}
