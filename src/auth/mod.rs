//! Token issuance and verification, and the extractor that turns a bearer token into a user.

mod current_user;
mod token;

pub use current_user::CurrentUser;
pub use token::{TokenError, TokenService};
