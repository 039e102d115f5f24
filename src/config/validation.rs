use crate::config::types::{
    Config, CrawlerConfig, FetcherConfig, FetcherMode, InputConfig, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    validate_timeouts(config)?;
    Ok(())
}

/// A rendered page needs its readiness wait and settle pause inside the
/// per-page budget, otherwise every render would be cut off.
fn validate_timeouts(config: &Config) -> Result<(), ConfigError> {
    if config.fetcher.mode != FetcherMode::Render {
        return Ok(());
    }

    let needed = config.fetcher.ready_timeout + config.fetcher.settle_time;
    if config.crawler.page_timeout < needed {
        return Err(ConfigError::Validation(format!(
            "page_timeout ({}ms) must cover ready_timeout + settle_time ({}ms)",
            config.crawler.page_timeout, needed
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(
            "max_depth must be >= 1, otherwise no page is ever fetched".to_string(),
        ));
    }

    if config.concurrency < 1 || config.concurrency > 32 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 32, got {}",
            config.concurrency
        )));
    }

    if config.page_timeout < 1000 {
        return Err(ConfigError::Validation(format!(
            "page_timeout must be >= 1000ms, got {}ms",
            config.page_timeout
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.mode == FetcherMode::Render {
        let endpoint = config.render_endpoint.as_deref().ok_or_else(|| {
            ConfigError::Validation("render_endpoint is required in render mode".to_string())
        })?;

        let url = Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid render_endpoint: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "render_endpoint must be http or https, got '{}'",
                endpoint
            )));
        }
    }

    if config.ready_timeout == 0 {
        return Err(ConfigError::Validation(
            "ready_timeout must be greater than zero".to_string(),
        ));
    }

    Ok(())
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

/// Validates seed list configuration
fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.seeds_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seeds_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
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
