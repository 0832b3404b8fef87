//! Trellis WebAC - Web Access Control resolution for LDP resources
//!
//! This crate answers one question for the HTTP layer: which access modes
//! does a session hold on a resource?
//!
//! # Overview
//!
//! - ACL graphs are split into [`Authorization`] rules
//! - The [`AuthorizationResolver`] walks the container hierarchy to the
//!   nearest applicable ACL and matches rules against the agent
//! - The [`WebacService`] adds administrator bypass, memoization and
//!   delegation
//!
//! # Architecture
//!
//! ```text
//!     HTTP layer
//!         │ get_access_modes(identifier, session)
//!         ▼
//!  ┌──────────────────────┐      ┌──────────────────┐
//!  │     WebacService     │─────▶│    ModeCache     │
//!  │ (admin, delegation)  │      │ (LRU + TTL)      │
//!  └──────────┬───────────┘      └──────────────────┘
//!             │ miss
//!  ┌──────────▼───────────┐      ┌──────────────────┐
//!  │ AuthorizationResolver│─────▶│ ResourceService  │
//!  │ (hierarchy walk)     │      │ (get, container) │
//!  └──────────────────────┘      └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_webac::{
//!     AccessMode, Graph, MemoryResourceService, Resource, Session, Term, Vocab,
//!     WebacConfig, WebacService,
//! };
//!
//! # tokio_test::block_on(async {
//! let acl = Graph::new()
//!     .with(Term::blank("rule"), Vocab::AgentClass.iri(), Term::iri(Vocab::FoafAgent.iri()))
//!     .with(Term::blank("rule"), Vocab::AccessTo.iri(), Term::iri("/"))
//!     .with(Term::blank("rule"), Vocab::Mode.iri(), Term::iri(Vocab::Read.iri()));
//!
//! let resources = Arc::new(MemoryResourceService::new());
//! resources.put(Resource::new("/").with_acl(acl));
//!
//! let service = WebacService::with_config(resources, WebacConfig::new().with_root("/"));
//! let modes = service.get_access_modes("/", &Session::anonymous()).await.unwrap();
//! assert_eq!(modes, [AccessMode::Read].into_iter().collect());
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod authorization;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod requirements;
pub mod resolver;
pub mod resource;
pub mod vocabulary;

use std::sync::Arc;

use http::Method;
use tracing::{debug, info, instrument, warn};

// Re-exports for convenience
pub use authorization::{extract_authorizations, Authorization};
pub use cache::{CacheConfig, CacheKey, CacheStats, LruTtlCache, ModeCache};
pub use config::WebacConfig;
pub use error::{AuthzError, AuthzResult};
pub use graph::{Graph, GraphName, Term, Triple};
pub use model::{AccessMode, AccessModes, AuthorizedModes, Session};
pub use requirements::{required_modes, AccessDecision, RequestTarget};
pub use resolver::AuthorizationResolver;
pub use resource::{AclWriter, MemoryResourceService, Resource, ResourceService};
pub use vocabulary::Vocab;

/// Main authorization service.
///
/// Combines the resolver with an optional cache and delegation handling.
pub struct WebacService {
    /// Hierarchy resolver.
    resolver: AuthorizationResolver,
    /// Memoized outcomes, if enabled.
    cache: Option<Arc<dyn ModeCache>>,
    /// Service configuration.
    config: WebacConfig,
}

impl std::fmt::Debug for WebacService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebacService")
            .field("resolver", &self.resolver)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

impl WebacService {
    /// Create a service with an explicit cache.
    pub fn new(
        resources: Arc<dyn ResourceService>,
        cache: Option<Arc<dyn ModeCache>>,
        config: WebacConfig,
    ) -> Self {
        let resolver = AuthorizationResolver::new(resources, config.anonymous_agent.clone());
        Self {
            resolver,
            cache,
            config,
        }
    }

    /// Create a service from configuration.
    ///
    /// An [`LruTtlCache`] is attached unless the cache configuration is
    /// disabled.
    pub fn with_config(resources: Arc<dyn ResourceService>, config: WebacConfig) -> Self {
        let cache = if config.cache_config.is_disabled() {
            None
        } else {
            Some(Arc::new(LruTtlCache::new(config.cache_config.clone())) as Arc<dyn ModeCache>)
        };
        Self::new(resources, cache, config)
    }

    /// Modes `session` holds on `identifier`.
    ///
    /// For delegated sessions the result is the intersection of the agent's
    /// and the delegate's modes.
    pub async fn get_access_modes(
        &self,
        identifier: &str,
        session: &Session,
    ) -> AuthzResult<AccessModes> {
        Ok(self
            .get_authorized_modes(identifier, session)
            .await?
            .into_modes())
    }

    /// Like [`get_access_modes`](Self::get_access_modes), also reporting the
    /// effective ACL found for the session's agent.
    #[instrument(skip(self, session), fields(agent = %session.agent(), delegate = ?session.delegate()))]
    pub async fn get_authorized_modes(
        &self,
        identifier: &str,
        session: &Session,
    ) -> AuthzResult<AuthorizedModes> {
        if self.config.is_administrator(session.agent()) {
            debug!("administrator session");
            return Ok(AuthorizedModes::new(None, AccessMode::all()));
        }

        let mut outcome = self.modes_for(identifier, session.agent()).await?;

        if let Some(delegate) = session.delegate() {
            let delegated = self.modes_for(identifier, delegate).await?;
            outcome = outcome.intersect(delegated.modes());
            debug!(modes = ?outcome.modes(), "narrowed by delegate");
        }

        Ok(outcome)
    }

    /// Checks a request against the modes `session` holds on `identifier`.
    pub async fn check(
        &self,
        identifier: &str,
        session: &Session,
        method: &Method,
        target: RequestTarget,
    ) -> AuthzResult<AccessDecision> {
        let required = required_modes(method, target);
        let granted = self
            .get_access_modes(identifier, session)
            .await
            .map_err(|err| {
                warn!(error = %err, retryable = err.is_retryable(), "access check failed");
                err
            })?;
        let anonymous = self.config.is_anonymous(session.agent());
        let decision = AccessDecision::evaluate(&required, &granted, anonymous);
        trellis_telemetry::metrics::record_decision(decision.label());
        Ok(decision)
    }

    /// Writes a permissive root ACL if the root has none.
    ///
    /// Returns `true` if an ACL was written. Does nothing when
    /// `initialize_root_acl` is off.
    pub async fn initialize(&self, writer: &dyn AclWriter) -> AuthzResult<bool> {
        if !self.config.initialize_root_acl {
            return Ok(false);
        }

        let root = &self.config.root;
        let existing = self.resolver.resources().get(root).await?;
        if existing.is_some_and(|resource| resource.has_acl()) {
            debug!(root = %root, "root ACL already present");
            return Ok(false);
        }

        writer.write_acl(root, default_root_acl(root)).await?;
        self.invalidate(root);
        info!(root = %root, "initialized root ACL");
        Ok(true)
    }

    /// Drops cached outcomes for `identifier`.
    ///
    /// Call after writing an ACL; descendants inheriting from it expire with
    /// the cache TTL, or use [`clear_cache`](Self::clear_cache).
    pub fn invalidate(&self, identifier: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(identifier);
        }
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Get cache statistics, if a cache is attached.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Get the service configuration.
    pub fn config(&self) -> &WebacConfig {
        &self.config
    }

    async fn modes_for(&self, identifier: &str, agent: &str) -> AuthzResult<AuthorizedModes> {
        if self.config.is_administrator(agent) {
            return Ok(AuthorizedModes::new(None, AccessMode::all()));
        }

        let Some(cache) = &self.cache else {
            return self.resolver.resolve(identifier, agent).await;
        };

        let key = CacheKey::new(identifier, agent);
        if let Some(cached) = cache.get(&key) {
            trellis_telemetry::metrics::record_cache_lookup(true);
            debug!(%key, cached = true, "returning cached modes");
            return Ok(cached);
        }
        trellis_telemetry::metrics::record_cache_lookup(false);

        let outcome = self.resolver.resolve(identifier, agent).await?;
        cache.insert(key, outcome.clone());
        Ok(outcome)
    }
}

/// The ACL written by [`WebacService::initialize`].
///
/// Grants every mode to `foaf:Agent` on the root and, by default, on all of
/// its descendants.
pub fn default_root_acl(root: &str) -> Graph {
    let rule = Term::iri(format!("{root}#auth"));
    let mut acl = Graph::new()
        .with(rule.clone(), Vocab::Type.iri(), Term::iri(Vocab::Authorization.iri()))
        .with(rule.clone(), Vocab::AgentClass.iri(), Term::iri(Vocab::FoafAgent.iri()))
        .with(rule.clone(), Vocab::AccessTo.iri(), Term::iri(root))
        .with(rule.clone(), Vocab::Default.iri(), Term::iri(root));
    for mode in AccessMode::ALL {
        acl.add(rule.clone(), Vocab::Mode.iri(), Term::iri(mode.iri()));
    }
    acl
}
