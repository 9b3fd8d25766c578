use crate::config::types::{CollectionConfig, Config, EndpointConfig, HttpConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_endpoint_config(&config.endpoints)?;
    validate_collection_config(&config.collection)?;
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1 second, got {}",
            config.timeout_secs
        )));
    }

    validate_seconds("backoff_factor", config.backoff_factor)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("menu_url", &config.menu_url),
        ("model_base_url", &config.model_base_url),
        ("catalog_base_url", &config.catalog_base_url),
    ] {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "{} '{}' cannot be used as a base URL",
                name, value
            )));
        }
    }

    if config.products_label.is_empty() {
        return Err(ConfigError::Validation(
            "products_label cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_collection_config(config: &CollectionConfig) -> Result<(), ConfigError> {
    if config.level < 1 {
        return Err(ConfigError::Validation(format!(
            "level must be >= 1, got {}",
            config.level
        )));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    validate_seconds("delay_seconds", config.delay_seconds)?;

    Ok(())
}

/// Durations must be finite and non-negative
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }
    Ok(())
}
