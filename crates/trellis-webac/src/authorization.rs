//! ACL rules and their extraction from access-control graphs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, Term, Triple};
use crate::model::{AccessMode, AccessModes};
use crate::vocabulary::Vocab;

/// One rule of an ACL.
///
/// All fields hold IRIs except `modes`. Unrecognized statements about the
/// rule's subject are dropped during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// The node this rule was read from.
    pub subject: Option<Term>,
    /// Agents granted directly.
    pub agents: BTreeSet<String>,
    /// Group documents whose members are granted.
    pub agent_groups: BTreeSet<String>,
    /// Structural agent classes (`foaf:Agent`, `acl:AuthenticatedAgent`).
    pub agent_classes: BTreeSet<String>,
    /// Resources this rule covers directly.
    pub access_to: BTreeSet<String>,
    /// Containers whose descendants inherit this rule.
    pub default_scope: BTreeSet<String>,
    /// Granted modes.
    pub modes: AccessModes,
}

impl Authorization {
    /// Builds a rule from the statements about one subject.
    pub fn from_triples<'a>(
        subject: &Term,
        triples: impl IntoIterator<Item = &'a Triple>,
    ) -> Self {
        let mut auth = Self {
            subject: Some(subject.clone()),
            ..Self::default()
        };

        for triple in triples {
            let Some(object) = triple.object.as_iri() else {
                continue;
            };
            let Some(predicate) = Vocab::from_iri(&triple.predicate) else {
                continue;
            };
            match predicate {
                Vocab::Agent => {
                    auth.agents.insert(object.to_string());
                }
                Vocab::AgentGroup => {
                    auth.agent_groups.insert(object.to_string());
                }
                Vocab::AgentClass => {
                    auth.agent_classes.insert(object.to_string());
                }
                Vocab::AccessTo => {
                    auth.access_to.insert(object.to_string());
                }
                Vocab::Default => {
                    auth.default_scope.insert(object.to_string());
                }
                Vocab::Mode => {
                    if let Some(mode) = AccessMode::from_iri(object) {
                        auth.modes.insert(mode);
                    }
                }
                _ => {}
            }
        }

        auth
    }

    /// True if this rule grants nothing.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// True if the rule lists `identifier` under `acl:accessTo`.
    pub fn applies_to(&self, identifier: &str) -> bool {
        self.access_to.contains(identifier)
    }

    /// True if the rule lists `identifier` under `acl:default`.
    pub fn is_default_for(&self, identifier: &str) -> bool {
        self.default_scope.contains(identifier)
    }

    /// True if the rule names `class` as an agent class.
    pub fn has_agent_class(&self, class: Vocab) -> bool {
        self.agent_classes.contains(class.iri())
    }
}

/// Splits an access-control graph into its rules, one per subject.
///
/// Subjects are returned in first-seen order.
pub fn extract_authorizations(graph: &Graph) -> Vec<Authorization> {
    graph
        .by_subject()
        .into_iter()
        .map(|(subject, triples)| Authorization::from_triples(subject, triples))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(term: Vocab) -> &'static str {
        term.iri()
    }

    #[test]
    fn test_extract_single_rule() {
        let rule = Term::iri("http://example.com/a?ext=acl#auth");
        let graph = Graph::new()
            .with(rule.clone(), iri(Vocab::Type), Term::iri(Vocab::Authorization.iri()))
            .with(rule.clone(), iri(Vocab::Agent), Term::iri("https://example.com/alice"))
            .with(rule.clone(), iri(Vocab::AccessTo), Term::iri("http://example.com/a"))
            .with(rule.clone(), iri(Vocab::Default), Term::iri("http://example.com/a"))
            .with(rule.clone(), iri(Vocab::Mode), Term::iri(Vocab::Read.iri()))
            .with(rule.clone(), iri(Vocab::Mode), Term::iri(Vocab::Write.iri()));

        let auths = extract_authorizations(&graph);
        assert_eq!(auths.len(), 1);
        let auth = &auths[0];
        assert_eq!(auth.subject.as_ref(), Some(&rule));
        assert!(auth.agents.contains("https://example.com/alice"));
        assert!(auth.applies_to("http://example.com/a"));
        assert!(auth.is_default_for("http://example.com/a"));
        assert_eq!(
            auth.modes,
            [AccessMode::Read, AccessMode::Write].into_iter().collect()
        );
    }

    #[test]
    fn test_groups_by_subject() {
        let graph = Graph::new()
            .with(Term::blank("r1"), iri(Vocab::Mode), Term::iri(Vocab::Read.iri()))
            .with(Term::blank("r2"), iri(Vocab::Mode), Term::iri(Vocab::Control.iri()))
            .with(Term::blank("r1"), iri(Vocab::AgentClass), Term::iri(Vocab::FoafAgent.iri()));

        let auths = extract_authorizations(&graph);
        assert_eq!(auths.len(), 2);
        assert!(auths[0].has_agent_class(Vocab::FoafAgent));
        assert!(auths[1].agent_classes.is_empty());
        assert!(auths[1].modes.contains(&AccessMode::Control));
    }

    #[test]
    fn test_unrecognized_statements_are_ignored() {
        let graph = Graph::new()
            .with(Term::blank("r"), "http://example.com/unknown", Term::iri("http://x"))
            .with(Term::blank("r"), iri(Vocab::Agent), Term::literal("not an iri"))
            .with(Term::blank("r"), iri(Vocab::Mode), Term::iri("http://example.com/Fly"));

        let auths = extract_authorizations(&graph);
        assert_eq!(auths.len(), 1);
        assert!(auths[0].is_empty());
        assert!(auths[0].agents.is_empty());
    }

    #[test]
    fn test_empty_graph() {
        assert!(extract_authorizations(&Graph::new()).is_empty());
    }
}
