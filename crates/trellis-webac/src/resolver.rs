//! Hierarchical ACL resolution.
//!
//! For a target identifier the resolver walks up the containment chain to the
//! nearest resource whose ACL holds applicable rules, keeps the rules that
//! match the requesting agent and unions their modes.
//!
//! Applicability depends on where the ACL was found:
//!
//! - on the target itself, rules must list the target under `acl:accessTo`;
//! - on an ancestor, rules listing the ancestor under `acl:default` win; when
//!   there are none, rules listing it under `acl:accessTo` apply instead.
//!
//! An ACL with no applicable rules does not stop the walk. When no ACL
//! applies up to the root, nothing is granted.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, trace, warn};

use crate::authorization::{extract_authorizations, Authorization};
use crate::error::{AuthzError, AuthzResult};
use crate::graph::Term;
use crate::model::{AccessModes, AuthorizedModes};
use crate::resource::ResourceService;
use crate::vocabulary::Vocab;

/// Resolves the modes an agent holds on a resource.
pub struct AuthorizationResolver {
    resources: Arc<dyn ResourceService>,
    anonymous_agent: String,
}

impl std::fmt::Debug for AuthorizationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationResolver")
            .field("anonymous_agent", &self.anonymous_agent)
            .finish_non_exhaustive()
    }
}

impl AuthorizationResolver {
    /// Create a resolver reading from `resources`.
    pub fn new(resources: Arc<dyn ResourceService>, anonymous_agent: impl Into<String>) -> Self {
        Self {
            resources,
            anonymous_agent: anonymous_agent.into(),
        }
    }

    /// The resource service this resolver reads from.
    pub fn resources(&self) -> &Arc<dyn ResourceService> {
        &self.resources
    }

    /// Resolves the modes `agent` holds on `identifier`.
    ///
    /// The target does not need to exist; resolution then starts at its
    /// nearest existing ancestor.
    #[instrument(skip(self))]
    pub async fn resolve(&self, identifier: &str, agent: &str) -> AuthzResult<AuthorizedModes> {
        let start = Instant::now();

        let Some((acl_identifier, authorizations)) = self.find_authorizations(identifier).await?
        else {
            debug!("no ACL found up to the root");
            trellis_telemetry::metrics::record_resolution(false, start.elapsed());
            return Ok(AuthorizedModes::denied());
        };

        let mut modes = AccessModes::new();
        for auth in &authorizations {
            if self.agent_matches(auth, agent).await? {
                trace!(subject = ?auth.subject, "authorization matches agent");
                modes.extend(auth.modes.iter().copied());
            }
        }

        debug!(effective_acl = %acl_identifier, ?modes, "resolved access modes");
        trellis_telemetry::metrics::record_resolution(true, start.elapsed());
        Ok(AuthorizedModes::new(Some(acl_identifier), modes))
    }

    /// Finds the nearest ACL with applicable rules.
    ///
    /// Returns the identifier of the resource carrying it together with the
    /// applicable rules. A resource that is its own container ends the walk;
    /// any longer containment cycle is a [`AuthzError::ContainmentCycle`].
    async fn find_authorizations(
        &self,
        identifier: &str,
    ) -> AuthzResult<Option<(String, Vec<Authorization>)>> {
        let mut current = identifier.to_string();
        let mut visited = HashSet::new();
        let mut top = true;

        loop {
            if let Some(resource) = self.resources.get(&current).await? {
                if resource.has_acl() {
                    let applicable = applicable_authorizations(
                        extract_authorizations(resource.access_control_triples()),
                        resource.identifier(),
                        top,
                    );
                    if !applicable.is_empty() {
                        return Ok(Some((current, applicable)));
                    }
                    debug!(acl = %current, top, "ACL has no applicable authorizations");
                }
            }

            match self.resources.get_container(&current) {
                Some(parent) if parent == current => {
                    warn!(identifier = %current, "resource is its own container, stopping walk");
                    return Ok(None);
                }
                Some(parent) => {
                    visited.insert(current);
                    if visited.contains(&parent) {
                        warn!(identifier = %parent, "containment cycle, stopping walk");
                        return Err(AuthzError::containment_cycle(parent));
                    }
                    current = parent;
                }
                None => return Ok(None),
            }
            top = false;
        }
    }

    async fn agent_matches(&self, auth: &Authorization, agent: &str) -> AuthzResult<bool> {
        if auth.has_agent_class(Vocab::FoafAgent) {
            return Ok(true);
        }
        if auth.has_agent_class(Vocab::AuthenticatedAgent) && agent != self.anonymous_agent {
            return Ok(true);
        }
        if auth.agents.contains(agent) {
            return Ok(true);
        }
        for group in &auth.agent_groups {
            if self.is_member(group, agent).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True if the group document lists `agent` via `vcard:hasMember`.
    ///
    /// A missing group document has no members.
    async fn is_member(&self, group: &str, agent: &str) -> AuthzResult<bool> {
        let location = group_location(group);
        let Some(document) = self
            .resources
            .get(location)
            .await
            .map_err(|e| AuthzError::group_resolution(group, e.to_string()))?
        else {
            debug!(group, location, "group document not found");
            return Ok(false);
        };

        let members = document.membership_triples();
        let agent = Term::iri(agent);
        let has_member = Vocab::HasMember.iri();
        Ok(members.contains(&Term::iri(group), has_member, &agent)
            || members.contains(&Term::iri(location), has_member, &agent))
    }
}

/// Selects the rules that govern `identifier` from the ACL stored on it.
///
/// `top` is true when `identifier` is the resource originally requested.
pub fn applicable_authorizations(
    authorizations: Vec<Authorization>,
    identifier: &str,
    top: bool,
) -> Vec<Authorization> {
    if top {
        return authorizations
            .into_iter()
            .filter(|a| a.applies_to(identifier))
            .collect();
    }

    let (inherited, rest): (Vec<_>, Vec<_>) = authorizations
        .into_iter()
        .partition(|a| a.is_default_for(identifier));
    if inherited.is_empty() {
        rest.into_iter().filter(|a| a.applies_to(identifier)).collect()
    } else {
        inherited
    }
}

/// Maps a group reference to the identifier of its document.
///
/// Drops a `#fragment`, then a `?query`, then one trailing `/`.
pub fn group_location(group: &str) -> &str {
    let base = group.split_once('#').map_or(group, |(base, _)| base);
    let base = base.split_once('?').map_or(base, |(base, _)| base);
    base.strip_suffix('/').unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(access_to: &[&str], default_scope: &[&str]) -> Authorization {
        Authorization {
            access_to: access_to.iter().map(ToString::to_string).collect(),
            default_scope: default_scope.iter().map(ToString::to_string).collect(),
            ..Authorization::default()
        }
    }

    #[test]
    fn test_group_location() {
        assert_eq!(group_location("http://example.com/groups#staff"), "http://example.com/groups");
        assert_eq!(group_location("http://example.com/groups?v=1#staff"), "http://example.com/groups");
        assert_eq!(group_location("http://example.com/groups/"), "http://example.com/groups");
        assert_eq!(group_location("http://example.com/groups/#x"), "http://example.com/groups");
        assert_eq!(group_location("http://example.com/groups"), "http://example.com/groups");
    }

    #[test]
    fn test_top_level_requires_access_to() {
        let rules = vec![rule(&["/a"], &[]), rule(&[], &["/a"]), rule(&["/other"], &[])];
        let applicable = applicable_authorizations(rules, "/a", true);
        assert_eq!(applicable.len(), 1);
        assert!(applicable[0].applies_to("/a"));
    }

    #[test]
    fn test_ancestor_prefers_default() {
        let rules = vec![rule(&["/a"], &[]), rule(&[], &["/a"])];
        let applicable = applicable_authorizations(rules, "/a", false);
        assert_eq!(applicable.len(), 1);
        assert!(applicable[0].is_default_for("/a"));
    }

    #[test]
    fn test_ancestor_falls_back_to_access_to() {
        let rules = vec![rule(&["/a"], &[]), rule(&["/b"], &[])];
        let applicable = applicable_authorizations(rules, "/a", false);
        assert_eq!(applicable.len(), 1);
        assert!(applicable[0].applies_to("/a"));
    }

    #[test]
    fn test_nothing_applicable() {
        let rules = vec![rule(&["/b"], &["/b"])];
        assert!(applicable_authorizations(rules.clone(), "/a", true).is_empty());
        assert!(applicable_authorizations(rules, "/a", false).is_empty());
    }
}
