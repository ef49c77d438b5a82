use thiserror::Error;

use super::types::Token;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Source of the current login state.
///
/// Token issuance is out of scope: implementations only report whether a
/// session is logged in and hand out the bearer token when one exists.
pub trait AuthProvider: Send + Sync {
    /// Whether a user is currently logged in.
    fn is_logged_in(&self) -> bool;

    /// The bearer token for server calls, if any.
    fn token(&self) -> Option<Token>;

    /// Identity to scope owned-book queries to, when known.
    fn user_id(&self) -> Option<String> {
        None
    }

    /// Name of this authentication method
    fn method_name(&self) -> &'static str;
}
