//! Typed configuration for Trellis WebAC.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`TRELLIS__SECTION__KEY`)
//! - Strict parsing (unknown fields are rejected)
//! - Layering: defaults or preset, then file, then environment
//!
//! # Example
//!
//! ```no_run
//! use trellis_config::ConfigLoader;
//!
//! # fn main() -> Result<(), trellis_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()
//!     .with_optional_file("trellis.toml")?
//!     .with_env_prefix("TRELLIS")
//!     .load()?;
//!
//! let webac = config.webac_config();
//! println!("root container: {}", webac.root);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [webac]
//! root = "trellis:data/"
//! admin_agents = ["https://example.com/ops#me"]
//! initialize_root_acl = true
//!
//! [webac.cache]
//! enabled = true
//! max_entries = 1000
//! ttl_secs = 600
//!
//! [telemetry]
//! service_name = "trellis"
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
