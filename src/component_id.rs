use std::{hash::Hash, ops::Deref, sync::Arc};

/// An opaque, process-unique name for a component instance.
///
/// Assigned by the host container when the component is constructed and
/// stable for the instance's lifetime. Used as the key of the
/// [`ManagedTypeRegistry`](crate::ManagedTypeRegistry).
///
/// Ids are cheap to clone and compare by value, so an id re-created from
/// the same string finds the same registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentId(Arc<str>);

impl ComponentId {
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self(name.into())
    }

    /// Returns the component's name as known to the host container.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ComponentId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for ComponentId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
