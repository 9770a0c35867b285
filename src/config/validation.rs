use crate::config::types::{Config, ScraperConfig, SearchEntryConfig, UserAgentConfig, MAX_EXTRA_PAGES};
use crate::geo::Coordinate;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_origin(&config.origin)?;
    validate_searches(&config.searches)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.request_timeout < 1 || config.request_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and 300 seconds, got {}",
            config.request_timeout
        )));
    }

    if config.max_extra_pages > MAX_EXTRA_PAGES {
        return Err(ConfigError::Validation(format!(
            "max_extra_pages must be at most {}, got {}",
            MAX_EXTRA_PAGES, config.max_extra_pages
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

/// The reference point itself must be a real place
fn validate_origin(origin: &Coordinate) -> Result<(), ConfigError> {
    if !origin.is_in_range() {
        return Err(ConfigError::Validation(format!(
            "origin must have latitude in [-90, 90] and longitude in [-180, 180], got ({}, {})",
            origin.latitude, origin.longitude
        )));
    }
    Ok(())
}

/// Validates search entries
fn validate_searches(searches: &[SearchEntryConfig]) -> Result<(), ConfigError> {
    if searches.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[search]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for search in searches {
        if search.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "search name cannot be empty".to_string(),
            ));
        }

        if !names.insert(search.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate search name '{}'",
                search.name
            )));
        }

        let url = Url::parse(&search.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid search URL '{}': {}", search.url, e))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "Search URL '{}' must use HTTP or HTTPS",
                search.url
            )));
        }

        if search.output.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "output path for search '{}' cannot be empty",
                search.name
            )));
        }
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

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
