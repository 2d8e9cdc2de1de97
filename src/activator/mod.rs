//! Activation strategies.
//!
//! An [`Activator`] knows how to produce one service instance from a
//! container. Variants either return stored values, construct through the
//! introspection capability, call factories, or wrap another activator to
//! memoize or intercept it.

mod cached;
mod class;
mod factory;
mod filtered;
mod instance;
mod value_object;

use std::sync::Arc;

pub use cached::CachedActivator;
pub use class::ClassActivator;
#[cfg(feature = "config")]
pub use factory::FactoryCatalog;
pub use factory::{Factory, FactoryActivator, FactoryBuilder, FactoryLoader, FileFactoryActivator};
pub use filtered::FilteredActivator;
pub use instance::InstanceActivator;
pub use value_object::ValueObjectActivator;

use crate::descriptors::{Constructor, Member};
use crate::error::{DiError, DiResult};
use crate::introspection::Arguments;
use crate::registration::AnyArc;
use crate::resolver::ParameterResolver;
use crate::traits::ContainerCore;

/// Strategy producing a service instance.
///
/// Activators are built once during registration and may be called any
/// number of times, possibly from several threads.
///
/// # Examples
///
/// ```rust
/// use maniple::{Activator, AnyArc, ContainerCore, DiResult, ServiceCollection, Lifetime};
/// use std::sync::Arc;
///
/// struct Answer;
///
/// impl Activator for Answer {
///     fn activate(&self, _services: &dyn ContainerCore) -> DiResult<AnyArc> {
///         Ok(Arc::new(42u32))
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_activator("answer", Answer, Lifetime::Transient);
///
/// let container = services.build();
/// assert_eq!(container.get("answer").unwrap().downcast_ref::<u32>(), Some(&42));
/// ```
pub trait Activator: Send + Sync {
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc>;
}

impl<A: Activator + ?Sized> Activator for Arc<A> {
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        (**self).activate(services)
    }
}

/// Resolves every parameter of `constructor` in declaration order.
///
/// Stops at the first parameter no resolver can supply.
pub(crate) fn bind_arguments(
    context: &str,
    constructor: &Constructor,
    resolver: &dyn ParameterResolver,
    services: &dyn ContainerCore,
) -> DiResult<Arguments> {
    let mut entries = Vec::with_capacity(constructor.parameters().len());
    for parameter in constructor.parameters() {
        match resolver.resolve_parameter(parameter, services)? {
            Some(value) => entries.push((parameter.name().to_string(), value)),
            None => {
                return Err(DiError::UnresolvableParameter {
                    context: context.to_string(),
                    name: parameter.name().to_string(),
                })
            }
        }
    }
    Ok(Arguments::new(context, entries))
}

/// Binds the arguments of `constructor` and invokes it.
pub(crate) fn construct(
    context: &str,
    constructor: &Constructor,
    resolver: &dyn ParameterResolver,
    services: &dyn ContainerCore,
) -> DiResult<AnyArc> {
    let args = bind_arguments(context, constructor, resolver, services)?;
    constructor
        .invoke(&args)
        .map_err(|source| DiError::construction(context, source))
}
