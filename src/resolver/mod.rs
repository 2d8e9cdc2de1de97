//! Resolvers supplying constructor arguments and property values.
//!
//! A resolver answers "can you supply a value for this member?". Not being
//! able to is an ordinary outcome (`Ok(None)`), never an error. Errors only
//! come back when a resolver decided to supply a value and fetching it from
//! the container failed.
//!
//! Resolvers compose through [`ResolverChain`]: the first one that supplies a
//! value wins, and order is significant.

use std::sync::Arc;

use crate::descriptors::{ParameterDescriptor, PropertyDescriptor};
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

mod chain;
mod key_value;
mod null;
mod typed;

pub use chain::{ParameterChain, PropertyChain, ResolverChain};
pub use key_value::KeyValueResolver;
pub use null::NullResolver;
pub use typed::{ContainerResolver, TypedResolver};

/// Supplies values for constructor and factory parameters.
pub trait ParameterResolver: Send + Sync {
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The resolver supplies `value`
    /// * `Ok(None)` - The resolver cannot supply this parameter
    /// * `Err(DiError)` - Fetching the chosen value failed
    fn resolve_parameter(
        &self,
        parameter: &ParameterDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>>;
}

/// Supplies values for settable properties of value objects.
///
/// Same contract as [`ParameterResolver`].
pub trait PropertyResolver: Send + Sync {
    fn resolve_property(
        &self,
        property: &PropertyDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>>;
}

impl<R: ParameterResolver + ?Sized> ParameterResolver for Arc<R> {
    fn resolve_parameter(
        &self,
        parameter: &ParameterDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        (**self).resolve_parameter(parameter, services)
    }
}

impl<R: PropertyResolver + ?Sized> PropertyResolver for Arc<R> {
    fn resolve_property(
        &self,
        property: &PropertyDescriptor,
        services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        (**self).resolve_property(property, services)
    }
}
