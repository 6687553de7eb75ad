use crate::config::types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot carry path segments",
            config.base_url
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout must be >= 1s, got {}s",
            config.connect_timeout
        )));
    }

    if config.manufacturers.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "manufacturers cannot contain empty names".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Every selector must compile, otherwise the crawl would fail on the first page
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (key, selector) in config.entries() {
        compile_selector(key, selector)?;
    }
    Ok(())
}

/// Compiles a CSS selector, mapping failures to a config error naming the key
pub(crate) fn compile_selector(key: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        key,
        selector: selector.to_string(),
    })
}

impl SelectorConfig {
    /// Selector values keyed by their config name
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("makes", self.makes.as_str()),
            ("categories", self.categories.as_str()),
            ("models", self.models.as_str()),
            ("sections", self.sections.as_str()),
            ("parts", self.parts.as_str()),
            ("part-label", self.part_label.as_str()),
        ]
    }
}
