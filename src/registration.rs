//! Registry storage shared by the builder and the container.

use std::any::Any;
use std::sync::Arc;

use crate::activator::Activator;
use crate::filter::ServiceFilter;
use crate::key::scopes_for;

// Type-erased Arc for service instances
pub type AnyArc = Arc<dyn Any + Send + Sync>;

#[cfg(feature = "ahash")]
pub(crate) type ServiceMap<V> = ahash::AHashMap<String, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type ServiceMap<V> = std::collections::HashMap<String, V>;

/// Activators keyed by identifier plus filter sequences keyed by scope.
///
/// Built once by [`ServiceCollection`](crate::ServiceCollection) and never
/// mutated after the container is constructed.
#[derive(Default)]
pub(crate) struct Registry {
    activators: ServiceMap<Arc<dyn Activator>>,
    filters: ServiceMap<Vec<Arc<dyn ServiceFilter>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Later registrations replace earlier ones.
    pub(crate) fn insert(&mut self, id: String, activator: Arc<dyn Activator>) {
        self.activators.insert(id, activator);
    }

    pub(crate) fn push_filter(&mut self, scope: String, filter: Arc<dyn ServiceFilter>) {
        self.filters.entry(scope).or_default().push(filter);
    }

    #[inline]
    pub(crate) fn get(&self, id: &str) -> Option<&Arc<dyn Activator>> {
        self.activators.get(id)
    }

    #[inline]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.activators.contains_key(id)
    }

    /// Global filters in registration order, then those registered for `id`.
    pub(crate) fn filters_for(&self, id: &str) -> Vec<Arc<dyn ServiceFilter>> {
        scopes_for(id)
            .filter_map(|scope| self.filters.get(scope))
            .flatten()
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.activators.len()
    }

    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    pub(crate) fn ids(&self) -> impl Iterator<Item = &str> {
        self.activators.keys().map(String::as_str)
    }

    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    pub(crate) fn filter_scopes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.filters.iter().map(|(scope, filters)| (scope.as_str(), filters.len()))
    }
}
