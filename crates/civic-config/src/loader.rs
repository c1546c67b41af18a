//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use civic_core::CivicError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `CIVIC_` prefix, `__` between sections
    ///    (e.g. `CIVIC_CACHE__ENABLED=false`)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, CivicError> {
        let config = Self::load_config(&config_dir.into())?;

        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, CivicError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("CIVIC_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("CIVIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_civic_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            CivicError::Configuration(message)
        })?;

        Ok(app_config)
    }
}

fn config_error_to_civic_error(err: ConfigError) -> CivicError {
    CivicError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("absent").to_string_lossy()).unwrap();
        assert_eq!(loader.get().cache.default_ttl_secs, 300);
    }

    #[test]
    fn test_default_and_local_files_are_layered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[cache]\nurl = \"redis://cache:6379/1\"\ndefault_ttl_secs = 120\n",
        )
        .unwrap();
        fs::write(dir.path().join("local.toml"), "[cache]\ndefault_ttl_secs = 30\n").unwrap();

        let config = ConfigLoader::new(dir.path().to_string_lossy())
            .unwrap()
            .into_config();

        assert_eq!(config.cache.url, "redis://cache:6379/1");
        assert_eq!(config.cache.default_ttl_secs, 30);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[cache]\npool_size = 0\n").unwrap();

        let err = ConfigLoader::new(dir.path().to_string_lossy()).unwrap_err();
        assert!(matches!(err, CivicError::Configuration(_)));
    }
}
