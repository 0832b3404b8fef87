//! Configuration schema types.
//!
//! Every section rejects unknown fields and fills unset fields with defaults.

use serde::{Deserialize, Serialize};
use trellis_webac::Vocab;

/// Access mode cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    /// Memoize resolved modes.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum cached (resource, agent) pairs.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Entry lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_max_entries() -> usize {
    1000
}

fn default_ttl_secs() -> u64 {
    600
}

/// WebAC configuration section.
///
/// # Example
///
/// ```
/// use trellis_config::WebacSection;
///
/// let section: WebacSection = toml::from_str(r#"
///     root = "http://example.com/"
///     admin_agents = ["https://example.com/ops"]
/// "#).unwrap();
///
/// assert_eq!(section.root, "http://example.com/");
/// assert!(section.initialize_root_acl);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WebacSection {
    /// Identifier of the root container.
    #[serde(default = "default_root")]
    pub root: String,

    /// Agent granted every mode without ACL evaluation.
    #[serde(default = "default_administrator_agent")]
    pub administrator_agent: String,

    /// Additional agents treated as the administrator.
    #[serde(default)]
    pub admin_agents: Vec<String>,

    /// Agent used for unauthenticated requests.
    #[serde(default = "default_anonymous_agent")]
    pub anonymous_agent: String,

    /// Write a permissive root ACL at startup if none exists.
    #[serde(default = "default_true")]
    pub initialize_root_acl: bool,

    /// Cache settings.
    #[serde(default)]
    pub cache: CacheSection,
}

impl Default for WebacSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            administrator_agent: default_administrator_agent(),
            admin_agents: Vec::new(),
            anonymous_agent: default_anonymous_agent(),
            initialize_root_acl: true,
            cache: CacheSection::default(),
        }
    }
}

fn default_root() -> String {
    "trellis:data/".to_string()
}

fn default_administrator_agent() -> String {
    Vocab::AdministratorAgent.iri().to_string()
}

fn default_anonymous_agent() -> String {
    Vocab::AnonymousAgent.iri().to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info", "trellis_webac=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in pretty output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Export metrics on a Prometheus endpoint.
    #[serde(default)]
    pub enabled: bool,

    /// Prometheus endpoint address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Service name reported at startup.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            logging: LoggingSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

fn default_service_name() -> String {
    "trellis".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webac_section_default() {
        let section = WebacSection::default();
        assert_eq!(section.root, "trellis:data/");
        assert_eq!(section.administrator_agent, Vocab::AdministratorAgent.iri());
        assert_eq!(section.anonymous_agent, Vocab::AnonymousAgent.iri());
        assert!(section.admin_agents.is_empty());
        assert!(section.initialize_root_acl);
        assert!(section.cache.enabled);
        assert_eq!(section.cache.max_entries, 1000);
        assert_eq!(section.cache.ttl_secs, 600);
    }

    #[test]
    fn test_webac_section_partial() {
        let toml = r#"
            root = "http://example.com/"

            [cache]
            ttl_secs = 30
        "#;
        let section: WebacSection = toml::from_str(toml).unwrap();
        assert_eq!(section.root, "http://example.com/");
        assert_eq!(section.cache.ttl_secs, 30);
        assert_eq!(section.cache.max_entries, 1000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
            root = "http://example.com/"
            cache_size = 10
        "#;
        let result: Result<WebacSection, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }

    #[test]
    fn test_telemetry_section_default() {
        let section = TelemetrySection::default();
        assert_eq!(section.service_name, "trellis");
        assert_eq!(section.logging.level, "info");
        assert!(!section.metrics.enabled);
    }
}
