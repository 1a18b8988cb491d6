use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on `max-concurrent-fetches`
const MAX_CONCURRENT_FETCHES: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;

    if config.fetch_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout must be >= 1 second, got {}",
            config.fetch_timeout
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    Ok(())
}

/// The seed must be an absolute http(s) URL with a host
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use the http or https scheme",
            seed
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        ))),
    }
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.sitemap_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "sitemap_path cannot be empty".to_string(),
        ));
    }

    if config.history_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "history_path cannot be empty".to_string(),
        ));
    }

    // The history store is append-only and must not alias the sitemap.
    if config.sitemap_path == config.history_path {
        return Err(ConfigError::Validation(format!(
            "sitemap_path and history_path must differ, both are '{}'",
            config.sitemap_path.display()
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
