//! RDF vocabulary used by WebAC.
//!
//! Every IRI the authorization core reads or writes is listed once in
//! [`Vocab`]. The table maps each symbolic name to its canonical IRI and back,
//! so the extractor can dispatch on a predicate without scattered string
//! constants.

use std::fmt;

/// Namespace of the W3C Web Access Control vocabulary.
pub const ACL_NS: &str = "http://www.w3.org/ns/auth/acl#";

/// Namespace of the FOAF vocabulary.
pub const FOAF_NS: &str = "http://xmlns.com/foaf/0.1/";

/// Namespace of the vCard vocabulary.
pub const VCARD_NS: &str = "http://www.w3.org/2006/vcard/ns#";

/// Namespace of the Trellis vocabulary.
pub const TRELLIS_NS: &str = "http://www.trellisldp.org/ns/trellis#";

/// Namespace of the RDF syntax vocabulary.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Symbolic names of the vocabulary terms known to WebAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vocab {
    /// `acl:Authorization`, the class of ACL rules.
    Authorization,
    /// `acl:agent`
    Agent,
    /// `acl:agentGroup`
    AgentGroup,
    /// `acl:agentClass`
    AgentClass,
    /// `acl:accessTo`
    AccessTo,
    /// `acl:default`
    Default,
    /// `acl:mode`
    Mode,
    /// `acl:Read`
    Read,
    /// `acl:Write`
    Write,
    /// `acl:Append`
    Append,
    /// `acl:Control`
    Control,
    /// `acl:AuthenticatedAgent`, any agent that is not anonymous.
    AuthenticatedAgent,
    /// `foaf:Agent`, any agent at all.
    FoafAgent,
    /// `vcard:hasMember`
    HasMember,
    /// `rdf:type`
    Type,
    /// `trellis:AdministratorAgent`
    AdministratorAgent,
    /// `trellis:AnonymousAgent`
    AnonymousAgent,
}

/// The lookup table backing [`Vocab::iri`] and [`Vocab::from_iri`].
pub static VOCABULARY: &[(Vocab, &str)] = &[
    (Vocab::Authorization, "http://www.w3.org/ns/auth/acl#Authorization"),
    (Vocab::Agent, "http://www.w3.org/ns/auth/acl#agent"),
    (Vocab::AgentGroup, "http://www.w3.org/ns/auth/acl#agentGroup"),
    (Vocab::AgentClass, "http://www.w3.org/ns/auth/acl#agentClass"),
    (Vocab::AccessTo, "http://www.w3.org/ns/auth/acl#accessTo"),
    (Vocab::Default, "http://www.w3.org/ns/auth/acl#default"),
    (Vocab::Mode, "http://www.w3.org/ns/auth/acl#mode"),
    (Vocab::Read, "http://www.w3.org/ns/auth/acl#Read"),
    (Vocab::Write, "http://www.w3.org/ns/auth/acl#Write"),
    (Vocab::Append, "http://www.w3.org/ns/auth/acl#Append"),
    (Vocab::Control, "http://www.w3.org/ns/auth/acl#Control"),
    (
        Vocab::AuthenticatedAgent,
        "http://www.w3.org/ns/auth/acl#AuthenticatedAgent",
    ),
    (Vocab::FoafAgent, "http://xmlns.com/foaf/0.1/Agent"),
    (Vocab::HasMember, "http://www.w3.org/2006/vcard/ns#hasMember"),
    (
        Vocab::Type,
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
    ),
    (
        Vocab::AdministratorAgent,
        "http://www.trellisldp.org/ns/trellis#AdministratorAgent",
    ),
    (
        Vocab::AnonymousAgent,
        "http://www.trellisldp.org/ns/trellis#AnonymousAgent",
    ),
];

impl Vocab {
    /// Returns the canonical IRI of this term.
    pub fn iri(self) -> &'static str {
        VOCABULARY
            .iter()
            .find(|(term, _)| *term == self)
            .map(|(_, iri)| *iri)
            .unwrap_or_default()
    }

    /// Looks up the term with the given IRI.
    pub fn from_iri(iri: &str) -> Option<Self> {
        VOCABULARY
            .iter()
            .find(|(_, candidate)| *candidate == iri)
            .map(|(term, _)| *term)
    }
}

impl fmt::Display for Vocab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_term_has_an_iri() {
        let terms = [
            Vocab::Authorization,
            Vocab::Agent,
            Vocab::AgentGroup,
            Vocab::AgentClass,
            Vocab::AccessTo,
            Vocab::Default,
            Vocab::Mode,
            Vocab::Read,
            Vocab::Write,
            Vocab::Append,
            Vocab::Control,
            Vocab::AuthenticatedAgent,
            Vocab::FoafAgent,
            Vocab::HasMember,
            Vocab::Type,
            Vocab::AdministratorAgent,
            Vocab::AnonymousAgent,
        ];
        assert_eq!(terms.len(), VOCABULARY.len());
        for term in terms {
            assert!(!term.iri().is_empty(), "{term:?} has no IRI");
            assert_eq!(Vocab::from_iri(term.iri()), Some(term));
        }
    }

    #[test]
    fn test_namespaces() {
        assert!(Vocab::Mode.iri().starts_with(ACL_NS));
        assert!(Vocab::FoafAgent.iri().starts_with(FOAF_NS));
        assert!(Vocab::HasMember.iri().starts_with(VCARD_NS));
        assert!(Vocab::Type.iri().starts_with(RDF_NS));
        assert!(Vocab::AnonymousAgent.iri().starts_with(TRELLIS_NS));
    }

    #[test]
    fn test_unknown_iri() {
        assert_eq!(Vocab::from_iri("http://example.com/ns#other"), None);
        assert_eq!(Vocab::from_iri(""), None);
    }
}
