//! Configuration for the WebAC service.

use std::collections::BTreeSet;

use crate::cache::CacheConfig;
use crate::error::{AuthzError, AuthzResult};
use crate::vocabulary::Vocab;

/// Configuration for [`WebacService`](crate::WebacService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebacConfig {
    /// Identifier of the root container.
    pub root: String,
    /// Agent that is granted every mode without consulting ACLs.
    pub administrator_agent: String,
    /// Additional agents treated as the administrator.
    pub admin_agents: BTreeSet<String>,
    /// Agent identifier used for unauthenticated requests.
    pub anonymous_agent: String,
    /// Write a permissive root ACL on startup when the root has none.
    pub initialize_root_acl: bool,
    /// Cache configuration.
    pub cache_config: CacheConfig,
}

impl Default for WebacConfig {
    fn default() -> Self {
        Self {
            root: "trellis:data/".to_string(),
            administrator_agent: Vocab::AdministratorAgent.iri().to_string(),
            admin_agents: BTreeSet::new(),
            anonymous_agent: Vocab::AnonymousAgent.iri().to_string(),
            initialize_root_acl: true,
            cache_config: CacheConfig::default(),
        }
    }
}

impl WebacConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root container identifier.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Add an agent that is treated as the administrator.
    pub fn with_admin_agent(mut self, agent: impl Into<String>) -> Self {
        self.admin_agents.insert(agent.into());
        self
    }

    /// Set the anonymous agent identifier.
    pub fn with_anonymous_agent(mut self, agent: impl Into<String>) -> Self {
        self.anonymous_agent = agent.into();
        self
    }

    /// Enable or disable root ACL initialization.
    pub fn with_initialize_root_acl(mut self, initialize: bool) -> Self {
        self.initialize_root_acl = initialize;
        self
    }

    /// Set the cache configuration.
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// True if `agent` bypasses ACL evaluation.
    pub fn is_administrator(&self, agent: &str) -> bool {
        agent == self.administrator_agent || self.admin_agents.contains(agent)
    }

    /// True if `agent` is the unauthenticated agent.
    pub fn is_anonymous(&self, agent: &str) -> bool {
        agent == self.anonymous_agent
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Config`] if the root or an agent identifier is
    /// empty, or if the anonymous agent is also an administrator.
    pub fn validate(&self) -> AuthzResult<()> {
        if self.root.trim().is_empty() {
            return Err(AuthzError::Config("root must not be empty".to_string()));
        }
        if self.administrator_agent.trim().is_empty() {
            return Err(AuthzError::Config(
                "administrator agent must not be empty".to_string(),
            ));
        }
        if self.anonymous_agent.trim().is_empty() {
            return Err(AuthzError::Config(
                "anonymous agent must not be empty".to_string(),
            ));
        }
        if self.is_administrator(&self.anonymous_agent) {
            return Err(AuthzError::Config(format!(
                "anonymous agent {} must not be an administrator",
                self.anonymous_agent
            )));
        }
        Ok(())
    }

    /// Create a production configuration.
    pub fn production() -> Self {
        Self {
            initialize_root_acl: false,
            cache_config: CacheConfig::production(),
            ..Self::default()
        }
    }

    /// Create a development configuration.
    pub fn development() -> Self {
        Self {
            initialize_root_acl: true,
            cache_config: CacheConfig::development(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WebacConfig::default();
        assert_eq!(config.root, "trellis:data/");
        assert!(config.is_administrator(Vocab::AdministratorAgent.iri()));
        assert!(config.is_anonymous(Vocab::AnonymousAgent.iri()));
        assert!(config.initialize_root_acl);
    }

    #[test]
    fn test_builder_pattern() {
        let config = WebacConfig::new()
            .with_root("http://example.com/")
            .with_admin_agent("https://example.com/root")
            .with_initialize_root_acl(false)
            .with_cache_config(CacheConfig::disabled());

        assert_eq!(config.root, "http://example.com/");
        assert!(config.is_administrator("https://example.com/root"));
        assert!(!config.is_administrator("https://example.com/alice"));
        assert!(!config.initialize_root_acl);
        assert!(config.cache_config.is_disabled());
    }

    #[test]
    fn test_validate() {
        assert!(WebacConfig::default().validate().is_ok());
        assert!(WebacConfig::production().validate().is_ok());

        let config = WebacConfig::new().with_root("  ");
        assert!(matches!(config.validate(), Err(AuthzError::Config(_))));

        let config = WebacConfig::new().with_anonymous_agent("");
        assert!(matches!(config.validate(), Err(AuthzError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_anonymous_administrator() {
        let config = WebacConfig::new().with_admin_agent(Vocab::AnonymousAgent.iri());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AuthzError::Config(_)));
        assert!(err.to_string().contains("must not be an administrator"));

        let config = WebacConfig::new().with_anonymous_agent(Vocab::AdministratorAgent.iri());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets() {
        assert!(!WebacConfig::production().initialize_root_acl);
        assert_eq!(
            WebacConfig::production().cache_config,
            CacheConfig::production()
        );
        assert_eq!(
            WebacConfig::development().cache_config,
            CacheConfig::development()
        );
    }
}
