//! Process startup utilities.

use civic_config::{AppConfig, ObservabilityConfig};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to
/// stderr so stdout carries only command output. Returns false if a
/// subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.is_json() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };

    result.is_ok()
}

fn default_directives(config: &ObservabilityConfig) -> String {
    format!("{},sqlx=warn", config.log_level)
}

/// Logs where the process is reading from.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("{} v{} ({})", config.app.name, config.app.version, config.app.environment);
    info!("Database:  {}", config.database.url);
    if config.cache.enabled {
        info!("Cache:     {}", config.cache.url);
    } else {
        info!("Cache:     in-memory (Redis disabled)");
    }
    info!("Cache TTL: {}s", config.cache.default_ttl_secs);
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_use_configured_level() {
        let config = ObservabilityConfig {
            log_level: "debug".to_string(),
            ..ObservabilityConfig::default()
        };
        assert_eq!(default_directives(&config), "debug,sqlx=warn");
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        let config = ObservabilityConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config));
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(&AppConfig::default());
    }
}
