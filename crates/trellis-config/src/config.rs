//! Top-level configuration.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trellis_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use trellis_webac::{CacheConfig, WebacConfig};

use crate::{CacheSection, ConfigError, LogFormat, TelemetrySection, WebacSection};

/// Complete Trellis WebAC configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use trellis_config::TrellisConfig;
///
/// let config = TrellisConfig::default();
/// assert_eq!(config.webac.root, "trellis:data/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct TrellisConfig {
    /// WebAC configuration.
    #[serde(default)]
    pub webac: WebacSection,

    /// Telemetry configuration (logging, metrics).
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl TrellisConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> TrellisConfigBuilder {
        TrellisConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The root or an agent identifier is empty
    /// - The anonymous agent is also an administrator
    /// - An enabled cache has a zero size or TTL
    /// - The log level is not a valid filter
    /// - Metrics are enabled with an invalid address
    pub fn validate(&self) -> Result<(), ConfigError> {
        let webac = &self.webac;

        if webac.root.trim().is_empty() {
            return Err(ConfigError::invalid_value("webac.root", "must not be empty"));
        }
        if webac.administrator_agent.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "webac.administrator_agent",
                "must not be empty",
            ));
        }
        if webac.anonymous_agent.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "webac.anonymous_agent",
                "must not be empty",
            ));
        }
        self.webac_config().validate()?;

        if webac.cache.enabled {
            if webac.cache.max_entries == 0 {
                return Err(ConfigError::invalid_value(
                    "webac.cache.max_entries",
                    "must be positive when the cache is enabled",
                ));
            }
            if webac.cache.ttl_secs == 0 {
                return Err(ConfigError::invalid_value(
                    "webac.cache.ttl_secs",
                    "must be positive when the cache is enabled",
                ));
            }
        }

        let logging = &self.telemetry.logging;
        if logging.enabled {
            trellis_telemetry::logging::create_env_filter(&logging.level)
                .map_err(|e| ConfigError::invalid_value("telemetry.logging.level", e.to_string()))?;
        }

        let metrics = &self.telemetry.metrics;
        if metrics.enabled && metrics.addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", metrics.addr),
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty, colored debug logs
    /// - Short-lived cache entries
    /// - Root ACL initialization on
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;
        config.telemetry.logging.include_location = true;

        config.webac.initialize_root_acl = true;
        config.webac.cache = CacheSection {
            enabled: true,
            max_entries: 1_000,
            ttl_secs: 5,
        };

        config
    }

    /// Create a production configuration preset.
    ///
    /// - JSON info logs
    /// - Large cache with a one minute TTL
    /// - Root ACL initialization off
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;

        config.webac.initialize_root_acl = false;
        config.webac.cache = CacheSection {
            enabled: true,
            max_entries: 50_000,
            ttl_secs: 60,
        };

        config
    }

    /// The [`WebacConfig`] described by the `webac` section.
    #[must_use]
    pub fn webac_config(&self) -> WebacConfig {
        let section = &self.webac;
        let cache_config = if section.cache.enabled {
            CacheConfig {
                max_entries: section.cache.max_entries,
                ttl: Duration::from_secs(section.cache.ttl_secs),
            }
        } else {
            CacheConfig::disabled()
        };

        let mut config = WebacConfig::new()
            .with_root(section.root.clone())
            .with_anonymous_agent(section.anonymous_agent.clone())
            .with_initialize_root_acl(section.initialize_root_acl)
            .with_cache_config(cache_config);
        config.administrator_agent.clone_from(&section.administrator_agent);
        for agent in &section.admin_agents {
            config = config.with_admin_agent(agent.clone());
        }
        config
    }

    /// The [`TelemetryConfig`] described by the `telemetry` section.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let section = &self.telemetry;
        let logging = LogConfig {
            enabled: section.logging.enabled,
            level: section.logging.level.clone(),
            json_format: section.logging.format == LogFormat::Json,
            span_events: false,
            file_line_info: section.logging.include_location,
            ansi: section.logging.ansi_enabled,
        };

        TelemetryConfig::builder()
            .service_name(&section.service_name)
            .logging(logging)
            .metrics(MetricsConfig {
                enabled: section.metrics.enabled,
                addr: section.metrics.addr.clone(),
            })
            .build()
    }
}

/// Builder for [`TrellisConfig`].
#[derive(Debug, Default)]
pub struct TrellisConfigBuilder {
    webac: Option<WebacSection>,
    telemetry: Option<TelemetrySection>,
}

impl TrellisConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the WebAC configuration.
    #[must_use]
    pub fn webac(mut self, webac: WebacSection) -> Self {
        self.webac = Some(webac);
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetrySection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration.
    ///
    /// Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> TrellisConfig {
        TrellisConfig {
            webac: self.webac.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }
}
