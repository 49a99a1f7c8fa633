//! Configuration management for Brew Lens
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BREW_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Image classifier configuration
    pub classifier: ClassifierConfig,

    /// Analysis pipeline configuration
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Image classification endpoint; empty when no model is installed
    pub endpoint: String,

    /// API key sent in the x-api-key header
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Number of ranked observations kept from each classification
    pub top_k: usize,
}

impl ClassifierConfig {
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// JPEG quality (1-100) used when storing photos
    pub jpeg_quality: u8,

    /// Largest accepted upload in bytes
    pub max_image_bytes: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BREW_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("classifier.endpoint", "")?
            .set_default("classifier.api_key", "")?
            .set_default("classifier.timeout_secs", 30)?
            .set_default("classifier.top_k", 10)?
            .set_default("analysis.jpeg_quality", 80)?
            .set_default("analysis.max_image_bytes", 10 * 1024 * 1024)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BREW__SECTION__KEY)
            .add_source(
                Environment::with_prefix("BREW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.analysis.jpeg_quality) {
            return Err(ConfigError::Message(
                "analysis.jpeg_quality must be between 1 and 100".to_string(),
            ));
        }
        if self.classifier.top_k == 0 {
            return Err(ConfigError::Message(
                "classifier.top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            classifier: ClassifierConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
            top_k: 10,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.classifier.is_configured());
    }

    #[test]
    fn test_rejects_zero_quality() {
        let mut config = Config::default();
        config.analysis.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let mut config = Config::default();
        config.classifier.top_k = 0;
        assert!(config.validate().is_err());
    }
}
