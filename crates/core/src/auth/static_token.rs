//! Token handed in from configuration or the environment.

use super::{AuthError, AuthProvider, Token};

/// Provider holding a token obtained out of band (login page, env var).
pub struct StaticTokenAuth {
    token: Token,
    user_id: Option<String>,
}

impl StaticTokenAuth {
    pub fn new(token: Token, user_id: Option<String>) -> Result<Self, AuthError> {
        if token.as_str().trim().is_empty() {
            return Err(AuthError::InvalidCredentials(
                "token must not be empty".to_string(),
            ));
        }
        Ok(Self { token, user_id })
    }
}

impl AuthProvider for StaticTokenAuth {
    fn is_logged_in(&self) -> bool {
        true
    }

    fn token(&self) -> Option<Token> {
        Some(self.token.clone())
    }

    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn method_name(&self) -> &'static str {
        "static_token"
    }
}
