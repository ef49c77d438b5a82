//! Mock auth provider for testing.

use std::sync::{Arc, RwLock};

use crate::auth::{AuthProvider, Token};

/// Auth provider whose login state can be flipped mid-test.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockAuth {
    token: Arc<RwLock<Option<Token>>>,
    user_id: Arc<RwLock<Option<String>>>,
}

impl MockAuth {
    /// Logged out.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Logged in with `token`.
    pub fn logged_in(token: &str) -> Self {
        let auth = Self::default();
        auth.log_in(token);
        auth
    }

    pub fn log_in(&self, token: &str) {
        if let Ok(mut current) = self.token.write() {
            *current = Some(Token::new(token));
        }
    }

    pub fn log_out(&self) {
        if let Ok(mut current) = self.token.write() {
            *current = None;
        }
    }

    pub fn set_user_id(&self, user_id: Option<&str>) {
        if let Ok(mut current) = self.user_id.write() {
            *current = user_id.map(str::to_string);
        }
    }
}

impl AuthProvider for MockAuth {
    fn is_logged_in(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn token(&self) -> Option<Token> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn user_id(&self) -> Option<String> {
        self.user_id.read().ok().and_then(|u| u.clone())
    }

    fn method_name(&self) -> &'static str {
        "mock"
    }
}
