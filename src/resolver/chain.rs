//! Ordered composition of resolvers.

use std::fmt;
use std::sync::Arc;

use super::{ParameterResolver, PropertyResolver};
use crate::descriptors::{ParameterDescriptor, PropertyDescriptor};
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

/// Resolvers tried in registration order; the first success wins.
///
/// A chain is itself a resolver, so chains nest. An empty chain never
/// succeeds.
///
/// # Examples
///
/// ```rust
/// use maniple::{KeyValueResolver, NullResolver, ParameterChain, ParameterDescriptor, ParameterResolver, ServiceCollection};
///
/// let chain = ParameterChain::new()
///     .with(NullResolver)
///     .with(KeyValueResolver::new().with("size", 1399u32))
///     .with(KeyValueResolver::new().with("size", 600u32));
///
/// let container = ServiceCollection::new().build();
/// let size = chain
///     .resolve_parameter(&ParameterDescriptor::untyped("size"), &container)
///     .unwrap()
///     .unwrap();
/// assert_eq!(size.downcast_ref::<u32>(), Some(&1399));
/// ```
pub struct ResolverChain<R: ?Sized> {
    resolvers: Vec<Arc<R>>,
}

/// Chain of parameter resolvers.
pub type ParameterChain = ResolverChain<dyn ParameterResolver>;
/// Chain of property resolvers.
pub type PropertyChain = ResolverChain<dyn PropertyResolver>;

impl<R: ?Sized> ResolverChain<R> {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Appends an already shared resolver.
    pub fn push(&mut self, resolver: Arc<R>) -> &mut Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl ResolverChain<dyn ParameterResolver> {
    pub fn with(mut self, resolver: impl ParameterResolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }
}

impl ResolverChain<dyn PropertyResolver> {
    pub fn with(mut self, resolver: impl PropertyResolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }
}

impl<R: ?Sized> Default for ResolverChain<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> Clone for ResolverChain<R> {
    fn clone(&self) -> Self {
        Self {
            resolvers: self.resolvers.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for ResolverChain<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverChain")
            .field("len", &self.resolvers.len())
            .finish()
    }
}

impl ParameterResolver for ResolverChain<dyn ParameterResolver> {
    fn resolve_parameter(
        &self,
        parameter: &ParameterDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        for resolver in &self.resolvers {
            if let Some(value) = resolver.resolve_parameter(parameter, services)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl PropertyResolver for ResolverChain<dyn PropertyResolver> {
    fn resolve_property(
        &self,
        property: &PropertyDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        for resolver in &self.resolvers {
            if let Some(value) = resolver.resolve_property(property, services)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;
    use crate::resolver::{KeyValueResolver, NullResolver};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Empty;

    impl ContainerCore for Empty {
        fn has(&self, _id: &str) -> bool {
            false
        }

        fn get(&self, id: &str) -> DiResult<AnyArc> {
            Err(DiError::NotFound(id.to_string()))
        }
    }

    struct Counting(Arc<AtomicUsize>);

    impl ParameterResolver for Counting {
        fn resolve_parameter(
            &self,
            _parameter: &ParameterDescriptor,
            _services: &dyn ContainerCore,
        ) -> DiResult<Option<AnyArc>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[test]
    fn empty_chain_never_resolves() {
        let chain = ParameterChain::new();
        assert!(chain.is_empty());
        let found = chain
            .resolve_parameter(&ParameterDescriptor::untyped("x"), &Empty)
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn stops_at_first_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = ParameterChain::new()
            .with(KeyValueResolver::new().with("x", 1u8))
            .with(Counting(calls.clone()));

        let found = chain
            .resolve_parameter(&ParameterDescriptor::untyped("x"), &Empty)
            .unwrap()
            .unwrap();
        assert_eq!(found.downcast_ref::<u8>(), Some(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn falls_through_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = ParameterChain::new()
            .with(Counting(calls.clone()))
            .with(NullResolver)
            .with(KeyValueResolver::new().with("x", 2u8));

        let found = chain
            .resolve_parameter(&ParameterDescriptor::untyped("x"), &Empty)
            .unwrap();
        assert_eq!(found.unwrap().downcast_ref::<u8>(), Some(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn property_chains_nest() {
        let inner = PropertyChain::new().with(KeyValueResolver::new().with("age", 30i32));
        let outer = PropertyChain::new().with(NullResolver).with(inner);
        assert_eq!(outer.len(), 2);

        let found = outer
            .resolve_property(&PropertyDescriptor::untyped("age"), &Empty)
            .unwrap();
        assert_eq!(found.unwrap().downcast_ref::<i32>(), Some(&30));
    }
}
