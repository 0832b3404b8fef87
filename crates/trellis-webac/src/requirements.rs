//! Mapping HTTP requests to required modes and granted modes to decisions.

use http::{Method, StatusCode};

use crate::model::{AccessMode, AccessModes};

/// What a request operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTarget {
    /// The resource itself.
    Resource,
    /// The resource's ACL (`?ext=acl`).
    Acl,
}

/// Modes a request with `method` needs on its target.
///
/// Any request addressing an ACL needs `Control`. Unknown methods need
/// `Write`.
pub fn required_modes(method: &Method, target: RequestTarget) -> AccessModes {
    if target == RequestTarget::Acl {
        return [AccessMode::Control].into_iter().collect();
    }
    let mode = match *method {
        Method::GET | Method::HEAD | Method::OPTIONS => AccessMode::Read,
        Method::POST => AccessMode::Append,
        _ => AccessMode::Write,
    };
    [mode].into_iter().collect()
}

/// True if `granted` covers `mode`. `Write` covers `Append`.
pub fn permits(granted: &AccessModes, mode: AccessMode) -> bool {
    granted.contains(&mode)
        || (mode == AccessMode::Append && granted.contains(&AccessMode::Write))
}

/// Outcome of checking granted modes against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Every required mode is granted.
    Granted,
    /// Denied for an unauthenticated agent.
    Unauthenticated {
        /// Required modes that were not granted.
        missing: AccessModes,
    },
    /// Denied for an authenticated agent.
    Forbidden {
        /// Required modes that were not granted.
        missing: AccessModes,
    },
}

impl AccessDecision {
    /// Checks `granted` against `required`.
    pub fn evaluate(required: &AccessModes, granted: &AccessModes, anonymous: bool) -> Self {
        let missing: AccessModes = required
            .iter()
            .copied()
            .filter(|mode| !permits(granted, *mode))
            .collect();
        if missing.is_empty() {
            Self::Granted
        } else if anonymous {
            Self::Unauthenticated { missing }
        } else {
            Self::Forbidden { missing }
        }
    }

    /// True if access is granted.
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// HTTP status for this decision.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Granted => StatusCode::OK,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Forbidden { .. } => "forbidden",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes(list: &[AccessMode]) -> AccessModes {
        list.iter().copied().collect()
    }

    #[test]
    fn test_required_modes_by_method() {
        let r = RequestTarget::Resource;
        assert_eq!(required_modes(&Method::GET, r), modes(&[AccessMode::Read]));
        assert_eq!(required_modes(&Method::HEAD, r), modes(&[AccessMode::Read]));
        assert_eq!(required_modes(&Method::POST, r), modes(&[AccessMode::Append]));
        assert_eq!(required_modes(&Method::PUT, r), modes(&[AccessMode::Write]));
        assert_eq!(required_modes(&Method::PATCH, r), modes(&[AccessMode::Write]));
        assert_eq!(required_modes(&Method::DELETE, r), modes(&[AccessMode::Write]));
    }

    #[test]
    fn test_acl_requests_need_control() {
        assert_eq!(
            required_modes(&Method::GET, RequestTarget::Acl),
            modes(&[AccessMode::Control])
        );
    }

    #[test]
    fn test_write_covers_append() {
        assert!(permits(&modes(&[AccessMode::Write]), AccessMode::Append));
        assert!(!permits(&modes(&[AccessMode::Append]), AccessMode::Write));
    }

    #[test]
    fn test_decisions() {
        let required = modes(&[AccessMode::Write]);

        let granted = AccessDecision::evaluate(&required, &modes(&[AccessMode::Write]), false);
        assert!(granted.is_granted());
        assert_eq!(granted.status_code(), StatusCode::OK);

        let anonymous = AccessDecision::evaluate(&required, &modes(&[AccessMode::Read]), true);
        assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

        let forbidden = AccessDecision::evaluate(&required, &AccessModes::new(), false);
        assert_eq!(
            forbidden,
            AccessDecision::Forbidden {
                missing: modes(&[AccessMode::Write])
            }
        );
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
    }
}
