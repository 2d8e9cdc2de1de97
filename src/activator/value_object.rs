use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::Activator;
use crate::descriptors::Member;
use crate::error::{DiError, DiResult};
use crate::introspection::TypeIntrospector;
use crate::registration::AnyArc;
use crate::resolver::PropertyResolver;
use crate::traits::ContainerCore;

/// Builds a value type through its default, then fills its properties.
///
/// Properties are best-effort: one the resolver cannot supply keeps its
/// default value, as does one whose supplied value has the wrong type.
/// Only a failing default (or a type that has none) fails the activation,
/// along with errors raised by services the resolver fetched.
///
/// # Examples
///
/// ```rust
/// use maniple::{
///     Activator, KeyValueResolver, PropertyDescriptor, ServiceCollection, TypeDescriptor,
///     TypeRegistry, ValueObjectActivator,
/// };
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Person { age: i32, name: String }
///
/// let mut types = TypeRegistry::new();
/// types.register(
///     TypeDescriptor::builder("Person")
///         .default_with(Person::default)
///         .property(PropertyDescriptor::typed("age", "i32"), |p: &mut Person, v: &i32| p.age = *v)
///         .property(PropertyDescriptor::typed("name", "String"), |p: &mut Person, v: &String| {
///             p.name = v.clone()
///         }),
/// );
///
/// let resolver = KeyValueResolver::new().with("name", "Alice".to_string());
/// let activator = ValueObjectActivator::new("Person", Arc::new(types), resolver);
///
/// let container = ServiceCollection::new().build();
/// let person = activator.activate(&container).unwrap().downcast::<Person>().ok().unwrap();
/// assert_eq!(person.name, "Alice");
/// assert_eq!(person.age, 0);
/// ```
#[derive(Clone)]
pub struct ValueObjectActivator {
    type_name: String,
    types: Arc<dyn TypeIntrospector>,
    resolver: Arc<dyn PropertyResolver>,
}

impl ValueObjectActivator {
    pub fn new(
        type_name: impl Into<String>,
        types: Arc<dyn TypeIntrospector>,
        resolver: impl PropertyResolver + 'static,
    ) -> Self {
        Self::with_shared_resolver(type_name, types, Arc::new(resolver))
    }

    pub fn with_shared_resolver(
        type_name: impl Into<String>,
        types: Arc<dyn TypeIntrospector>,
        resolver: Arc<dyn PropertyResolver>,
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

impl Activator for ValueObjectActivator {
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        let name = self.type_name.as_str();
        let descriptor = self
            .types
            .describe(name)
            .ok_or_else(|| DiError::construction(name, format!("type '{}' is not known", name)))?;

        let mut instance = descriptor
            .instantiate()
            .ok_or_else(|| {
                DiError::construction(name, format!("type '{}' has no default", name))
            })?
            .map_err(|source| DiError::construction(name, source))?;

        for slot in descriptor.properties() {
            let property = slot.descriptor();
            let Some(value) = self.resolver.resolve_property(property, services)? else {
                continue;
            };
            if !slot.assign(instance.as_mut(), &value) {
                warn!(
                    type_name = name,
                    property = property.name(),
                    "resolved value has the wrong type, property left at its default"
                );
            }
        }

        Ok(AnyArc::from(instance))
    }
}

impl fmt::Debug for ValueObjectActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueObjectActivator")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{PropertyDescriptor, TypeDescriptor};
    use crate::introspection::TypeRegistry;
    use crate::resolver::{KeyValueResolver, NullResolver};

    struct Empty;

    impl ContainerCore for Empty {
        fn has(&self, _id: &str) -> bool {
            false
        }

        fn get(&self, id: &str) -> DiResult<AnyArc> {
            Err(DiError::NotFound(id.to_string()))
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn types() -> Arc<dyn TypeIntrospector> {
        let mut types = TypeRegistry::new();
        types
            .register(
                TypeDescriptor::builder("Point")
                    .default_with(|| Point { x: -1, y: -1 })
                    .property(PropertyDescriptor::untyped("x"), |p: &mut Point, v: &i32| p.x = *v)
                    .property(PropertyDescriptor::untyped("y"), |p: &mut Point, v: &i32| p.y = *v),
            )
            .register(
                TypeDescriptor::builder("Broken")
                    .try_default_with(|| -> Result<Point, crate::error::BoxError> { Err("nope".into()) }),
            )
            .register(TypeDescriptor::builder("NoDefault"));
        Arc::new(types)
    }

    #[test]
    fn unresolved_properties_keep_defaults() {
        let value = ValueObjectActivator::new("Point", types(), NullResolver)
            .activate(&Empty)
            .unwrap();
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point { x: -1, y: -1 }));
    }

    #[test]
    fn mistyped_property_is_skipped() {
        let resolver = KeyValueResolver::new().with("x", 3i32).with("y", "four");
        let value = ValueObjectActivator::new("Point", types(), resolver)
            .activate(&Empty)
            .unwrap();
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point { x: 3, y: -1 }));
    }

    #[test]
    fn only_bare_construction_can_fail() {
        for name in ["Broken", "NoDefault", "Unknown"] {
            let result = ValueObjectActivator::new(name, types(), NullResolver).activate(&Empty);
            assert!(matches!(result, Err(DiError::ConstructionFailure { .. })), "{}", name);
        }
    }
}
