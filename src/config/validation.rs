use crate::config::types::{
    HttpConfig, IngestionConfig, IngestionSection, SiteConfig, UserAgentConfig,
};
use crate::crawler::PageSelectors;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &IngestionConfig) -> Result<(), ConfigError> {
    validate_ingestion_section(&config.ingestion)?;
    validate_site_config(&config.site)?;
    PageSelectors::compile(&config.selectors)?;
    validate_http_config(&config.http)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates corpus directories and run settings
fn validate_ingestion_section(section: &IngestionSection) -> Result<(), ConfigError> {
    if section.raw_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("raw-dir cannot be empty".to_string()));
    }

    if section.clean_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "clean-dir cannot be empty".to_string(),
        ));
    }

    // Normalizing in place would rewrite the captures it is reading
    if section.raw_dir == section.clean_dir {
        return Err(ConfigError::Validation(format!(
            "raw-dir and clean-dir must differ, both are '{}'",
            section.raw_dir.display()
        )));
    }

    if section.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(
            "checkpoint-interval must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the start and base URLs
fn validate_site_config(site: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("start-url", &site.start_url)?;
    validate_http_url("base-url", &site.base_url)?;
    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use the http or https scheme",
            field, value
        )));
    }

    Ok(())
}

/// Validates timeouts, retry policy and concurrency
fn validate_http_config(http: &HttpConfig) -> Result<(), ConfigError> {
    if http.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout-ms must be >= 1".to_string(),
        ));
    }

    if http.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-ms must be >= 1".to_string(),
        ));
    }

    if http.retry_base_ms > http.retry_max_ms {
        return Err(ConfigError::Validation(format!(
            "retry-base-ms ({}) cannot exceed retry-max-ms ({})",
            http.retry_base_ms, http.retry_max_ms
        )));
    }

    if http.article_concurrency < 1 || http.article_concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "article-concurrency must be between 1 and 64, got {}",
            http.article_concurrency
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
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
