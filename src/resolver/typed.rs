//! Resolvers driven by a member's declared type name.

use std::sync::Arc;

use super::{ParameterResolver, PropertyResolver};
use crate::descriptors::{Member, ParameterDescriptor, PropertyDescriptor};
use crate::error::DiResult;
use crate::key::container_type_name;
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

/// Supplies `services.get(type_name)` when the container has that type.
///
/// Untyped members are never resolved, and the container is not consulted
/// for them at all. The value is not checked against the declared type.
///
/// # Examples
///
/// ```rust
/// use maniple::{ParameterDescriptor, ParameterResolver, ServiceCollection, TypedResolver};
///
/// let mut services = ServiceCollection::new();
/// services.add_instance("Engine", 1399u32);
/// let container = services.build();
///
/// let typed = ParameterDescriptor::typed("engine", "Engine");
/// let value = TypedResolver.resolve_parameter(&typed, &container).unwrap().unwrap();
/// assert_eq!(value.downcast_ref::<u32>(), Some(&1399));
///
/// let untyped = ParameterDescriptor::untyped("engine");
/// assert!(TypedResolver.resolve_parameter(&untyped, &container).unwrap().is_none());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TypedResolver;

impl TypedResolver {
    fn resolve(member: &dyn Member, services: &dyn ContainerCore) -> DiResult<Option<AnyArc>> {
        match member.type_name() {
            Some(type_name) if services.has(type_name) => services.get(type_name).map(Some),
            _ => Ok(None),
        }
    }
}

impl ParameterResolver for TypedResolver {
    fn resolve_parameter(
        &self,
        parameter: &ParameterDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Self::resolve(parameter, services)
    }
}

impl PropertyResolver for TypedResolver {
    fn resolve_property(
        &self,
        property: &PropertyDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Self::resolve(property, services)
    }
}

/// Supplies the container itself to members declared with
/// [`container_type_name()`].
///
/// The value is an `Arc<dyn ContainerCore>` stored in the usual `AnyArc`, so
/// constructors read it with `args.get::<Arc<dyn ContainerCore>>(i)`.
/// Containers that cannot [`share`](ContainerCore::share) themselves are
/// treated as "cannot supply".
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerResolver;

impl ContainerResolver {
    fn resolve(member: &dyn Member, services: &dyn ContainerCore) -> Option<AnyArc> {
        if member.type_name() != Some(container_type_name()) {
            return None;
        }
        services
            .share()
            .map(|shared| Arc::new(shared) as AnyArc)
    }
}

impl ParameterResolver for ContainerResolver {
    fn resolve_parameter(
        &self,
        parameter: &ParameterDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Ok(Self::resolve(parameter, services))
    }
}

impl PropertyResolver for ContainerResolver {
    fn resolve_property(
        &self,
        property: &PropertyDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Ok(Self::resolve(property, services))
    }
}
