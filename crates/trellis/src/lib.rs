//! # Trellis
//!
//! **Web Access Control for Linked Data Platform resources**
//!
//! Trellis decides which access modes (Read, Write, Append, Control) an agent
//! holds on a resource by locating the nearest applicable ACL in the
//! container hierarchy.
//!
//! - **Hierarchy resolution** – inherited `acl:default` rules, group
//!   membership, agent classes
//! - **Delegation** – a delegated session holds the intersection of both
//!   agents' modes
//! - **Caching** – optional LRU + TTL memoization of resolved modes
//! - **Observability** – structured logs and Prometheus metrics
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trellis::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), trellis::Error> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("trellis.toml")?
//!         .with_env_prefix("TRELLIS")
//!         .load()?;
//!     trellis::init_telemetry(&config)?;
//!
//!     let resources = Arc::new(MemoryResourceService::new());
//!     let service = trellis::bootstrap(&config, resources.clone(), resources.as_ref()).await?;
//!
//!     let modes = service.get_access_modes("trellis:data/", &Session::anonymous()).await?;
//!     println!("{modes:?}");
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/trellis/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

// Re-export WebAC types
pub use trellis_webac as webac;

// Re-export configuration types
pub use trellis_config as config;

// Re-export telemetry types
pub use trellis_telemetry as telemetry;

use trellis_config::{ConfigError, TrellisConfig};
use trellis_telemetry::TelemetryError;
use trellis_webac::{AclWriter, AuthzError, ResourceService, WebacService};

/// Errors raised while starting Trellis WebAC.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging or metrics could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// Access control evaluation or root ACL initialization failed.
    #[error(transparent)]
    Authz(#[from] AuthzError),
}

/// Initializes logging and metrics from `config`.
///
/// # Errors
///
/// Returns [`Error::Telemetry`] if a subscriber or recorder is already
/// installed, or an address is invalid.
pub fn init_telemetry(config: &TrellisConfig) -> Result<(), Error> {
    trellis_telemetry::init_telemetry(&config.telemetry_config())?;
    Ok(())
}

/// Builds a [`WebacService`] over `resources` as described by `config`.
pub fn build_service(config: &TrellisConfig, resources: Arc<dyn ResourceService>) -> WebacService {
    WebacService::with_config(resources, config.webac_config())
}

/// Builds the service and writes the root ACL if configured to.
///
/// # Errors
///
/// Returns [`Error::Authz`] if the WebAC settings are invalid, or the root
/// lookup or ACL write fails.
pub async fn bootstrap(
    config: &TrellisConfig,
    resources: Arc<dyn ResourceService>,
    writer: &dyn AclWriter,
) -> Result<WebacService, Error> {
    config.webac_config().validate()?;
    let service = build_service(config, resources);
    let initialized = service.initialize(writer).await?;
    info!(
        root = %service.config().root,
        initialized,
        cache = service.cache_stats().is_some(),
        "webac service ready"
    );
    Ok(service)
}

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use trellis_config::{ConfigLoader, TrellisConfig};

    pub use trellis_webac::{
        AccessDecision, AccessMode, AccessModes, AclWriter, AuthorizedModes, AuthzError,
        AuthzResult, Graph, MemoryResourceService, RequestTarget, Resource, ResourceService,
        Session, Term, Vocab, WebacConfig, WebacService,
    };
}
