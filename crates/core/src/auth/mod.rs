mod anonymous;
mod static_token;
mod traits;
mod types;

pub use anonymous::*;
pub use static_token::*;
pub use traits::*;
pub use types::*;

use crate::config::AuthConfig;

/// Factory function to create an auth provider from config
pub fn create_auth_provider(
    config: &AuthConfig,
    user_id: Option<String>,
) -> Result<Box<dyn AuthProvider>, AuthError> {
    match &config.token {
        None => Ok(Box::new(AnonymousAuth::new())),
        Some(token) if token.is_empty() => Err(AuthError::ConfigurationError(
            "auth.token is set but empty; remove it to run anonymously".to_string(),
        )),
        Some(token) => Ok(Box::new(StaticTokenAuth::new(
            Token::new(token.clone()),
            user_id,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_anonymous() {
        let config = AuthConfig { token: None };
        let auth = create_auth_provider(&config, None).unwrap();
        assert_eq!(auth.method_name(), "anonymous");
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_create_provider_static_token() {
        let config = AuthConfig {
            token: Some("jwt".to_string()),
        };
        let auth = create_auth_provider(&config, Some("u1".to_string())).unwrap();
        assert_eq!(auth.method_name(), "static_token");
        assert_eq!(auth.user_id().as_deref(), Some("u1"));
    }

    #[test]
    fn test_create_provider_empty_token_fails() {
        let config = AuthConfig {
            token: Some(String::new()),
        };
        let result = create_auth_provider(&config, None);
        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }
}
