//! Explicit name-to-value overrides.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{ParameterResolver, PropertyResolver};
use crate::descriptors::{Member, ParameterDescriptor, PropertyDescriptor};
use crate::error::DiResult;
use crate::registration::{AnyArc, ServiceMap};
use crate::traits::ContainerCore;

/// Supplies fixed values keyed by member name, ignoring declared types.
///
/// # Examples
///
/// ```rust
/// use maniple::{KeyValueResolver, PropertyDescriptor, PropertyResolver, ServiceCollection};
///
/// let overrides = KeyValueResolver::new()
///     .with("name", "Alice".to_string())
///     .with("age", 33i32);
///
/// let container = ServiceCollection::new().build();
/// let age = overrides
///     .resolve_property(&PropertyDescriptor::typed("age", "String"), &container)
///     .unwrap()
///     .unwrap();
/// assert_eq!(age.downcast_ref::<i32>(), Some(&33));
/// ```
#[derive(Clone, Default)]
pub struct KeyValueResolver {
    values: ServiceMap<AnyArc>,
}

impl KeyValueResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: Any + Send + Sync>(mut self, name: impl Into<String>, value: V) -> Self {
        self.insert(name, Arc::new(value));
        self
    }

    /// Adds or replaces a value that is already type-erased.
    pub fn insert(&mut self, name: impl Into<String>, value: AnyArc) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn lookup(&self, member: &dyn Member) -> Option<AnyArc> {
        self.values.get(member.name()).cloned()
    }
}

impl FromIterator<(String, AnyArc)> for KeyValueResolver {
    fn from_iter<I: IntoIterator<Item = (String, AnyArc)>>(iter: I) -> Self {
        let mut resolver = Self::new();
        for (name, value) in iter {
            resolver.insert(name, value);
        }
        resolver
    }
}

impl fmt::Debug for KeyValueResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("KeyValueResolver").field("keys", &keys).finish()
    }
}

impl ParameterResolver for KeyValueResolver {
    fn resolve_parameter(
        &self,
        parameter: &ParameterDescriptor,
        _services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Ok(self.lookup(parameter))
    }
}

impl PropertyResolver for KeyValueResolver {
    fn resolve_property(
        &self,
        property: &PropertyDescriptor,
        _services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Ok(self.lookup(property))
    }
}
