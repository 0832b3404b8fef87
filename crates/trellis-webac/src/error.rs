//! Error types for WebAC resolution.

use http::StatusCode;
use thiserror::Error;

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Errors that can occur while resolving access modes.
///
/// An error is never an implicit denial or grant: callers must surface it as
/// a server failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthzError {
    /// The resource service failed to load a resource.
    #[error("failed to load resource {identifier}: {message}")]
    ResourceLookup {
        /// Identifier being loaded.
        identifier: String,
        /// Error message.
        message: String,
    },

    /// Walking up the hierarchy led back to an already visited resource.
    #[error("containment cycle through {identifier}")]
    ContainmentCycle {
        /// First identifier reached twice.
        identifier: String,
    },

    /// A group document could not be read.
    #[error("failed to resolve agent group {group}: {message}")]
    GroupResolution {
        /// Group identifier.
        group: String,
        /// Error message.
        message: String,
    },

    /// Writing an ACL failed.
    #[error("failed to write ACL for {identifier}: {message}")]
    AclWrite {
        /// Resource whose ACL was written.
        identifier: String,
        /// Error message.
        message: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthzError {
    /// Create a resource lookup error.
    pub fn resource_lookup(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceLookup {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a containment cycle error.
    pub fn containment_cycle(identifier: impl Into<String>) -> Self {
        Self::ContainmentCycle {
            identifier: identifier.into(),
        }
    }

    /// Create a group resolution error.
    pub fn group_resolution(group: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GroupResolution {
            group: group.into(),
            message: message.into(),
        }
    }

    /// Create an ACL write error.
    pub fn acl_write(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AclWrite {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Check if this is a retryable error.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ResourceLookup { .. } | Self::GroupResolution { .. } | Self::AclWrite { .. }
        )
    }

    /// HTTP status for a request that failed with this error.
    ///
    /// Failures are kept distinct from denials, which map to 401/403.
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_lookup_error() {
        let err = AuthzError::resource_lookup("http://example.com/a", "connection reset");
        assert!(err.to_string().contains("http://example.com/a"));
        assert!(err.to_string().contains("connection reset"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_containment_cycle_not_retryable() {
        let err = AuthzError::containment_cycle("http://example.com/a/");
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "containment cycle through http://example.com/a/"
        );
    }

    #[test]
    fn test_errors_are_server_failures() {
        let err = AuthzError::group_resolution("http://example.com/g", "timeout");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = AuthzError::Config("bad".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
