use super::{types::Config, ConfigError};

/// Upper bound Google Books accepts for `maxResults`.
const MAX_CATALOG_RESULTS: u32 = 40;

/// Validate configuration
/// Currently validates:
/// - Page size is not 0
/// - Catalog max_results is within 1..=40
/// - Catalog and store URLs are http(s)
/// - Timeouts are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.session.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "session.page_size cannot be 0".to_string(),
        ));
    }

    if config.catalog.max_results == 0 || config.catalog.max_results > MAX_CATALOG_RESULTS {
        return Err(ConfigError::ValidationError(format!(
            "catalog.max_results must be between 1 and {}",
            MAX_CATALOG_RESULTS
        )));
    }

    check_url("catalog.base_url", &config.catalog.base_url)?;
    check_url("store.endpoint", &config.store.endpoint)?;

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.store.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "store.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got '{}'",
            field, url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_page_size_zero_fails() {
        let mut config = Config::default();
        config.session.page_size = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_max_results_bounds() {
        let mut config = Config::default();
        config.catalog.max_results = 41;
        assert!(validate_config(&config).is_err());

        config.catalog.max_results = 0;
        assert!(validate_config(&config).is_err());

        config.catalog.max_results = 1;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_bad_store_endpoint() {
        let mut config = Config::default();
        config.store.endpoint = "localhost:3001/graphql".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("store.endpoint"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.store.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
