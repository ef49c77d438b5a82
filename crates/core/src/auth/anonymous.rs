use super::{AuthProvider, Token};

/// Provider for sessions that never log in.
pub struct AnonymousAuth;

impl AnonymousAuth {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnonymousAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for AnonymousAuth {
    fn is_logged_in(&self) -> bool {
        false
    }

    fn token(&self) -> Option<Token> {
        None
    }

    fn method_name(&self) -> &'static str {
        "anonymous"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_never_logged_in() {
        let auth = AnonymousAuth::new();
        assert!(!auth.is_logged_in());
        assert!(auth.token().is_none());
        assert!(auth.user_id().is_none());
    }

    #[test]
    fn test_anonymous_method_name() {
        assert_eq!(AnonymousAuth::default().method_name(), "anonymous");
    }
}
