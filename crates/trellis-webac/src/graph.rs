//! Minimal RDF graph values.
//!
//! WebAC only needs to read triples, group them by subject and match simple
//! patterns, so this module models terms and triples as plain values rather
//! than binding to a full RDF toolkit.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// An IRI.
    Iri(String),
    /// A blank node label.
    Blank(String),
    /// A literal lexical form.
    Literal(String),
}

impl Term {
    /// Creates an IRI term.
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    /// Creates a blank node term.
    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// Creates a literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Returns the IRI if this term is one.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns true if this term is the IRI `iri`.
    pub fn is_iri(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(value) => write!(f, "{value:?}"),
        }
    }
}

/// A single RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject (IRI or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Term,
}

impl Triple {
    /// Creates a new triple.
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// Named graphs a resource carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphName {
    /// User-managed content (`trellis:PreferUserManaged`).
    UserManaged,
    /// Access control triples (`trellis:PreferAccessControl`).
    AccessControl,
}

/// An ordered collection of triples.
///
/// Duplicate triples are ignored on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty graph, usable in constant contexts.
    pub const fn empty() -> Self {
        Self { triples: Vec::new() }
    }

    /// Adds a triple.
    pub fn insert(&mut self, triple: Triple) {
        if !self.triples.contains(&triple) {
            self.triples.push(triple);
        }
    }

    /// Adds a triple built from its parts.
    pub fn add(&mut self, subject: Term, predicate: impl Into<String>, object: Term) {
        self.insert(Triple::new(subject, predicate, object));
    }

    /// Builder-style variant of [`Graph::add`].
    pub fn with(mut self, subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        self.add(subject, predicate, object);
        self
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True if the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates over all triples.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// True if the exact statement is present.
    pub fn contains(&self, subject: &Term, predicate: &str, object: &Term) -> bool {
        self.triples
            .iter()
            .any(|t| &t.subject == subject && t.predicate == predicate && &t.object == object)
    }

    /// Objects of all triples matching `subject` and `predicate`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Groups triples by subject, keeping first-seen subject order.
    pub fn by_subject(&self) -> IndexMap<&Term, Vec<&Triple>> {
        let mut groups: IndexMap<&Term, Vec<&Triple>> = IndexMap::new();
        for triple in &self.triples {
            groups.entry(&triple.subject).or_default().push(triple);
        }
        groups
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Self::new();
        for triple in iter {
            graph.insert(triple);
        }
        graph
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: &str = "http://example.com/p";

    #[test]
    fn test_insert_deduplicates() {
        let mut graph = Graph::new();
        graph.add(Term::iri("s"), P, Term::literal("o"));
        graph.add(Term::iri("s"), P, Term::literal("o"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_objects() {
        let s = Term::iri("http://example.com/s");
        let graph = Graph::new()
            .with(s.clone(), P, Term::iri("http://example.com/a"))
            .with(s.clone(), P, Term::iri("http://example.com/b"))
            .with(Term::blank("x"), P, Term::iri("http://example.com/c"));

        let objects: Vec<_> = graph.objects(&s, P).collect();
        assert_eq!(objects.len(), 2);
        assert!(graph.contains(&Term::blank("x"), P, &Term::iri("http://example.com/c")));
        assert!(!graph.contains(&s, P, &Term::iri("http://example.com/c")));
    }

    #[test]
    fn test_by_subject_keeps_order() {
        let graph: Graph = vec![
            Triple::new(Term::blank("b"), P, Term::literal("1")),
            Triple::new(Term::blank("a"), P, Term::literal("2")),
            Triple::new(Term::blank("b"), P, Term::literal("3")),
        ]
        .into_iter()
        .collect();

        let (a, b) = (Term::blank("a"), Term::blank("b"));
        let groups = graph.by_subject();
        let subjects: Vec<&Term> = groups.keys().copied().collect();
        assert_eq!(subjects, vec![&b, &a]);
        assert_eq!(groups.get(&b).map(Vec::len), Some(2));
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::iri("http://x").to_string(), "<http://x>");
        assert_eq!(Term::blank("n1").to_string(), "_:n1");
        assert_eq!(Term::literal("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn test_term_serde() {
        let json = serde_json::to_string(&Term::iri("http://x")).unwrap();
        assert_eq!(json, r#"{"type":"iri","value":"http://x"}"#);
        let back: Term = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Term::iri("http://x"));
    }
}
