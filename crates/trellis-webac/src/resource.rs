//! Resource lookup collaborators.
//!
//! The WebAC core never owns persistence. It reads resources through
//! [`ResourceService`] and, when initializing the root ACL, writes through
//! [`AclWriter`]. [`MemoryResourceService`] backs both with a map and is used
//! by tests and embedded deployments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::AuthzResult;
use crate::graph::{Graph, GraphName};

/// A stored resource as seen by the authorization core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    identifier: String,
    user_managed: Graph,
    acl: Option<Graph>,
}

impl Resource {
    /// A resource with no content and no ACL.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            user_managed: Graph::new(),
            acl: None,
        }
    }

    /// Sets the user-managed graph.
    pub fn with_content(mut self, graph: Graph) -> Self {
        self.user_managed = graph;
        self
    }

    /// Attaches an ACL graph.
    pub fn with_acl(mut self, graph: Graph) -> Self {
        self.acl = Some(graph);
        self
    }

    /// The resource identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// True if the resource carries its own ACL, even an empty one.
    pub fn has_acl(&self) -> bool {
        self.acl.is_some()
    }

    /// Triples of the resource's ACL, empty when there is none.
    pub fn access_control_triples(&self) -> &Graph {
        static EMPTY: Graph = Graph::empty();
        self.acl.as_ref().unwrap_or(&EMPTY)
    }

    /// Triples that may list group members (the user-managed graph).
    pub fn membership_triples(&self) -> &Graph {
        &self.user_managed
    }

    /// Returns a named graph, if the resource carries it.
    pub fn graph(&self, name: GraphName) -> Option<&Graph> {
        match name {
            GraphName::UserManaged => Some(&self.user_managed),
            GraphName::AccessControl => self.acl.as_ref(),
        }
    }
}

/// Read access to stored resources.
#[async_trait]
pub trait ResourceService: Send + Sync {
    /// Loads a resource. `Ok(None)` means it does not exist.
    async fn get(&self, identifier: &str) -> AuthzResult<Option<Resource>>;

    /// Identifier of the logical parent container, `None` for the root.
    fn get_container(&self, identifier: &str) -> Option<String> {
        parent_identifier(identifier)
    }
}

/// Write access to ACL graphs.
#[async_trait]
pub trait AclWriter: Send + Sync {
    /// Replaces the ACL of `identifier`.
    async fn write_acl(&self, identifier: &str, acl: Graph) -> AuthzResult<()>;
}

/// Computes the parent of a hierarchical identifier by path truncation.
///
/// The root is the scheme and authority followed by `/` (`http://host/`), or
/// everything up to the first `/` for identifiers without an authority
/// (`trellis:data/`, `/`). A single trailing `/` is ignored.
pub fn parent_identifier(identifier: &str) -> Option<String> {
    let root_end = match identifier.find("://") {
        Some(i) => identifier[i + 3..].find('/').map(|j| i + 3 + j)?,
        None => identifier.find('/')?,
    };
    let (root, path) = identifier.split_at(root_end + 1);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    match path.rfind('/') {
        Some(i) => Some(format!("{root}{}", &path[..i])),
        None => Some(root.to_string()),
    }
}

/// A map-backed [`ResourceService`] and [`AclWriter`].
#[derive(Debug, Default)]
pub struct MemoryResourceService {
    resources: RwLock<HashMap<String, Resource>>,
    lookups: AtomicU64,
}

impl MemoryResourceService {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a resource.
    pub fn put(&self, resource: Resource) {
        self.resources
            .write()
            .insert(resource.identifier().to_string(), resource);
    }

    /// Removes a resource.
    pub fn remove(&self, identifier: &str) -> Option<Resource> {
        self.resources.write().remove(identifier)
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// Number of `get` calls served so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ResourceService for MemoryResourceService {
    async fn get(&self, identifier: &str) -> AuthzResult<Option<Resource>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.resources.read().get(identifier).cloned())
    }
}

#[async_trait]
impl AclWriter for MemoryResourceService {
    async fn write_acl(&self, identifier: &str, acl: Graph) -> AuthzResult<()> {
        let mut resources = self.resources.write();
        let resource = resources
            .remove(identifier)
            .unwrap_or_else(|| Resource::new(identifier));
        resources.insert(identifier.to_string(), resource.with_acl(acl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_of_http_identifiers() {
        assert_eq!(
            parent_identifier("http://example.com/a/b").as_deref(),
            Some("http://example.com/a")
        );
        assert_eq!(
            parent_identifier("http://example.com/a/b/").as_deref(),
            Some("http://example.com/a")
        );
        assert_eq!(
            parent_identifier("http://example.com/a").as_deref(),
            Some("http://example.com/")
        );
        assert_eq!(parent_identifier("http://example.com/"), None);
        assert_eq!(parent_identifier("http://example.com"), None);
    }

    #[test]
    fn test_parent_of_paths() {
        assert_eq!(parent_identifier("/a/b").as_deref(), Some("/a"));
        assert_eq!(parent_identifier("/a").as_deref(), Some("/"));
        assert_eq!(parent_identifier("/"), None);
        assert_eq!(
            parent_identifier("trellis:data/a").as_deref(),
            Some("trellis:data/")
        );
        assert_eq!(parent_identifier("trellis:data/"), None);
        assert_eq!(parent_identifier("no-hierarchy"), None);
    }

    #[test]
    fn test_resource_acl_presence() {
        let plain = Resource::new("/a");
        assert!(!plain.has_acl());
        assert!(plain.access_control_triples().is_empty());
        assert!(plain.graph(GraphName::AccessControl).is_none());

        let with_acl = Resource::new("/a").with_acl(Graph::new());
        assert!(with_acl.has_acl());
        assert!(with_acl.graph(GraphName::AccessControl).is_some());
    }

    #[tokio::test]
    async fn test_memory_service_roundtrip() {
        let service = MemoryResourceService::new();
        service.put(Resource::new("/a"));

        assert!(service.get("/a").await.unwrap().is_some());
        assert!(service.get("/missing").await.unwrap().is_none());
        assert_eq!(service.lookups(), 2);
        assert_eq!(service.get_container("/a/b").as_deref(), Some("/a"));
    }

    #[tokio::test]
    async fn test_write_acl_creates_or_replaces() {
        let service = MemoryResourceService::new();
        service.write_acl("/", Graph::new()).await.unwrap();
        let root = service.get("/").await.unwrap().unwrap();
        assert!(root.has_acl());
        assert_eq!(service.len(), 1);
    }
}
