use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::{construct, Activator};
use crate::error::{DiError, DiResult};
use crate::introspection::TypeIntrospector;
use crate::registration::AnyArc;
use crate::resolver::ParameterResolver;
use crate::traits::ContainerCore;

/// Constructs a type known to the introspection capability.
///
/// Types with a required constructor have each parameter resolved through
/// the resolver in declaration order. Types without one are instantiated
/// through their zero-argument default.
///
/// # Errors
///
/// * [`DiError::UnresolvableParameter`] naming the type and the first
///   parameter nothing could supply
/// * [`DiError::ConstructionFailure`] when the type is unknown or not
///   constructible, or when its constructor fails
///
/// # Examples
///
/// ```rust
/// use maniple::{
///     Activator, ClassActivator, Container, ParameterDescriptor, ServiceCollection,
///     TypeDescriptor, TypeRegistry, TypedResolver,
/// };
/// use std::sync::Arc;
///
/// struct Engine { size: u32 }
/// struct Car { engine: Arc<Engine> }
///
/// let mut types = TypeRegistry::new();
/// types.register(
///     TypeDescriptor::builder("Car")
///         .parameter(ParameterDescriptor::typed("engine", "Engine"))
///         .constructor(|args| Ok(Car { engine: args.get::<Engine>(0)? })),
/// );
///
/// let mut services = ServiceCollection::new();
/// services.add_instance("Engine", Engine { size: 1399 });
/// let container = services.build();
///
/// let activator = ClassActivator::new("Car", Arc::new(types), TypedResolver);
/// let car = activator.activate(&container).unwrap().downcast::<Car>().ok().unwrap();
/// assert_eq!(car.engine.size, 1399);
/// ```
#[derive(Clone)]
pub struct ClassActivator {
    type_name: String,
    types: Arc<dyn TypeIntrospector>,
    resolver: Arc<dyn ParameterResolver>,
}

impl ClassActivator {
    pub fn new(
        type_name: impl Into<String>,
        types: Arc<dyn TypeIntrospector>,
        resolver: impl ParameterResolver + 'static,
    ) -> Self {
        Self::with_shared_resolver(type_name, types, Arc::new(resolver))
    }

    pub fn with_shared_resolver(
        type_name: impl Into<String>,
        types: Arc<dyn TypeIntrospector>,
        resolver: Arc<dyn ParameterResolver>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            types,
            resolver,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Activator for ClassActivator {
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        let name = self.type_name.as_str();
        let descriptor = self
            .types
            .describe(name)
            .ok_or_else(|| DiError::construction(name, format!("type '{}' is not known", name)))?;

        if let Some(constructor) = descriptor.constructor() {
            trace!(type_name = name, parameters = constructor.parameters().len(), "constructing");
            return construct(name, constructor, &*self.resolver, services);
        }

        match descriptor.instantiate() {
            Some(instance) => instance
                .map(AnyArc::from)
                .map_err(|source| DiError::construction(name, source)),
            None => Err(DiError::construction(
                name,
                format!("type '{}' has neither a constructor nor a default", name),
            )),
        }
    }
}

impl fmt::Debug for ClassActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassActivator")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
