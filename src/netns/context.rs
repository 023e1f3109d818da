//! Namespace naming.

use std::fmt;

/// Prefix the platform's networking agent gives to router namespaces.
///
/// The agent names the namespace `qrouter-<router-id>`; this crate only
/// reproduces the convention, it never creates the namespace.
pub const NAMESPACE_PREFIX: &str = "qrouter";

/// A host-level network namespace through which a tenant network is reachable.
///
/// Owned by the platform's networking agent; this crate treats it as a
/// pre-existing, read-only execution context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceContext {
    name: String,
}

impl NamespaceContext {
    /// Derives the namespace for a router id.
    ///
    /// # Example
    ///
    /// ```
    /// use vmreach::netns::NamespaceContext;
    ///
    /// let ns = NamespaceContext::for_router("r1");
    /// assert_eq!(ns.name(), "qrouter-r1");
    /// ```
    #[must_use]
    pub fn for_router(router_id: &str) -> Self {
        Self {
            name: format!("{NAMESPACE_PREFIX}-{router_id}"),
        }
    }

    /// The namespace name as it appears in the host's namespace registry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NamespaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
