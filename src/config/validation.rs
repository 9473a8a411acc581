use crate::config::types::{Config, ConvertMode, ConverterConfig, DownloaderConfig, UserAgentConfig};
use crate::ConfigError;
use std::path::Path;
use url::Url;

const MAX_POOL_SIZE: usize = 256;

/// Validates the entire configuration, including the links between sections
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let downloader = config.enabled_downloader();
    let converter = config.enabled_converter();

    if let Some(downloader) = downloader {
        validate_downloader_config(downloader)?;
    }
    if let Some(converter) = converter {
        validate_converter_config(converter)?;
    }

    validate_links(config)?;
    Ok(())
}

/// Validates the cross-component wiring flags
fn validate_links(config: &Config) -> Result<(), ConfigError> {
    let downloader = config.enabled_downloader();
    let converter = config.enabled_converter();

    if downloader.is_some_and(|d| d.link_converter) {
        match converter {
            None => {
                return Err(ConfigError::Validation(
                    "link-converter is set but no converter is enabled".to_string(),
                ))
            }
            Some(c) if c.mode != ConvertMode::Reactive => {
                return Err(ConfigError::Validation(
                    "link-converter requires the converter to run in reactive mode".to_string(),
                ))
            }
            Some(_) => {}
        }
    }

    if let Some(converter) = converter {
        let fed = downloader.is_some_and(|d| d.link_converter);
        if converter.mode == ConvertMode::Reactive && !fed {
            return Err(ConfigError::Validation(
                "reactive converter needs an enabled downloader with link-converter = true"
                    .to_string(),
            ));
        }

        if converter.link_indexer && config.enabled_indexer().is_none() {
            return Err(ConfigError::Validation(
                "link-indexer is set but no indexer is enabled".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates downloader configuration
pub(crate) fn validate_downloader_config(config: &DownloaderConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max-depth must be >= 1, got {}",
            config.max_depth
        )));
    }

    validate_pool_size("spider-pool-size", config.spider_pool_size)?;

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    validate_path("seed-path", &config.seed_path)?;
    validate_path("source-dir", &config.source_dir)?;
    validate_path("catalog-path", &config.catalog_path)?;
    validate_user_agent_config(&config.user_agent)?;

    Ok(())
}

/// Validates converter configuration
pub(crate) fn validate_converter_config(config: &ConverterConfig) -> Result<(), ConfigError> {
    validate_pool_size("resolver-pool-size", config.resolver_pool_size)?;
    validate_path("done-dir", &config.done_dir)?;
    validate_path("stopwords-path", &config.stopwords_path)?;

    if config.mode == ConvertMode::Batch {
        validate_path("source-dir", &config.source_dir)?;
        if config.source_dir == config.done_dir {
            return Err(ConfigError::Validation(
                "done-dir must differ from source-dir in batch mode".to_string(),
            ));
        }
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

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::Validation(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

fn validate_pool_size(key: &str, size: usize) -> Result<(), ConfigError> {
    if size < 1 || size > MAX_POOL_SIZE {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            key, MAX_POOL_SIZE, size
        )));
    }
    Ok(())
}

fn validate_path(key: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }
    Ok(())
}
