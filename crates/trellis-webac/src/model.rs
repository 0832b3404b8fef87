//! Core value types: access modes, sessions and resolution outcomes.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vocabulary::Vocab;

/// A WebAC capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Read the resource.
    Read,
    /// Replace or delete the resource.
    Write,
    /// Add to the resource without removing anything.
    Append,
    /// Read and modify the resource's ACL.
    Control,
}

/// A deduplicated, unordered set of access modes.
pub type AccessModes = BTreeSet<AccessMode>;

impl AccessMode {
    /// All four modes.
    pub const ALL: [AccessMode; 4] = [
        AccessMode::Read,
        AccessMode::Write,
        AccessMode::Append,
        AccessMode::Control,
    ];

    /// The full mode set.
    pub fn all() -> AccessModes {
        Self::ALL.into_iter().collect()
    }

    /// The `acl:` IRI of this mode.
    pub fn iri(self) -> &'static str {
        self.vocab().iri()
    }

    /// Maps an `acl:` mode IRI to a mode.
    pub fn from_iri(iri: &str) -> Option<Self> {
        match Vocab::from_iri(iri)? {
            Vocab::Read => Some(Self::Read),
            Vocab::Write => Some(Self::Write),
            Vocab::Append => Some(Self::Append),
            Vocab::Control => Some(Self::Control),
            _ => None,
        }
    }

    fn vocab(self) -> Vocab {
        match self {
            Self::Read => Vocab::Read,
            Self::Write => Vocab::Write,
            Self::Append => Vocab::Append,
            Self::Control => Vocab::Control,
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Append => "Append",
            Self::Control => "Control",
        };
        f.write_str(name)
    }
}

/// The requesting principal of an access check.
///
/// `delegated_by` is set when the agent acts on behalf of another agent; the
/// resolved modes are then the intersection of both agents' modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    agent: String,
    delegated_by: Option<String>,
}

impl Session {
    /// A session for `agent`.
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            delegated_by: None,
        }
    }

    /// A session for the unauthenticated agent.
    pub fn anonymous() -> Self {
        Self::new(Vocab::AnonymousAgent.iri())
    }

    /// A session for the built-in administrator.
    pub fn administrator() -> Self {
        Self::new(Vocab::AdministratorAgent.iri())
    }

    /// Marks the session as delegated by `delegate`.
    pub fn delegated_by(mut self, delegate: impl Into<String>) -> Self {
        self.delegated_by = Some(delegate.into());
        self
    }

    /// The requesting agent.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// The delegating agent, if any.
    pub fn delegate(&self) -> Option<&str> {
        self.delegated_by.as_deref()
    }
}

/// Outcome of resolving the ACL for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedModes {
    effective_acl: Option<String>,
    modes: AccessModes,
}

impl AuthorizedModes {
    /// Creates a new outcome.
    pub fn new(effective_acl: Option<String>, modes: AccessModes) -> Self {
        Self {
            effective_acl,
            modes,
        }
    }

    /// No ACL was found: nothing is granted.
    pub fn denied() -> Self {
        Self::new(None, AccessModes::new())
    }

    /// Identifier of the resource whose ACL was applied.
    pub fn effective_acl(&self) -> Option<&str> {
        self.effective_acl.as_deref()
    }

    /// The granted modes.
    pub fn modes(&self) -> &AccessModes {
        &self.modes
    }

    /// Consumes the outcome, returning the granted modes.
    pub fn into_modes(self) -> AccessModes {
        self.modes
    }

    /// Narrows the granted modes to those also present in `other`.
    pub fn intersect(self, other: &AccessModes) -> Self {
        let modes = self.modes.intersection(other).copied().collect();
        Self::new(self.effective_acl, modes)
    }
}
