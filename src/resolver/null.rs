use super::{ParameterResolver, PropertyResolver};
use crate::descriptors::{ParameterDescriptor, PropertyDescriptor};
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

/// Never supplies anything. Terminates a chain or disables container lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl ParameterResolver for NullResolver {
    fn resolve_parameter(
        &self,
        _parameter: &ParameterDescriptor,
        _services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Ok(None)
    }
}

impl PropertyResolver for NullResolver {
    fn resolve_property(
        &self,
        _property: &PropertyDescriptor,
        _services: &dyn ContainerCore,
    ) -> DiResult<Option<AnyArc>> {
        Ok(None)
    }
}
