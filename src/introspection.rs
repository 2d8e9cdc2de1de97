//! The introspection capability: type descriptors looked up by name.
//!
//! Without runtime reflection, constructible types are enumerated once at
//! startup into a [`TypeRegistry`]. The engine only ever asks it two things:
//! "can you construct `name`?" and "describe `name`".

use std::any::Any;
use std::sync::Arc;

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::registration::{AnyArc, ServiceMap};

/// Capability answering questions about constructible types.
pub trait TypeIntrospector: Send + Sync {
    /// Descriptor for `type_name`, if the type is known.
    fn describe(&self, type_name: &str) -> Option<Arc<TypeDescriptor>>;

    /// Whether `type_name` is known and has a constructor or default.
    fn can_construct(&self, type_name: &str) -> bool {
        self.describe(type_name)
            .is_some_and(|descriptor| descriptor.is_constructible())
    }
}

/// Descriptor table populated at startup.
///
/// # Examples
///
/// ```rust
/// use maniple::{TypeDescriptor, TypeIntrospector, TypeRegistry};
///
/// struct Engine;
///
/// let mut types = TypeRegistry::new();
/// types.register(TypeDescriptor::builder("Engine").default_with(|| Engine));
///
/// assert!(types.can_construct("Engine"));
/// assert!(!types.can_construct("Car"));
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    types: ServiceMap<Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the descriptor keyed by its own name.
    pub fn register(&mut self, descriptor: impl Into<TypeDescriptor>) -> &mut Self {
        let descriptor = descriptor.into();
        self.types
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeIntrospector for TypeRegistry {
    fn describe(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(type_name).cloned()
    }
}

/// Resolved argument list handed to constructors and factories.
///
/// Arguments keep declaration order; typed access downcasts and reports a
/// [`DiError::TypeMismatch`] naming the offending parameter.
pub struct Arguments {
    context: String,
    entries: Vec<(String, AnyArc)>,
}

impl Arguments {
    pub(crate) fn new(context: impl Into<String>, entries: Vec<(String, AnyArc)>) -> Self {
        Self {
            context: context.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The untyped value at `index`.
    pub fn raw(&self, index: usize) -> Option<&AnyArc> {
        self.entries.get(index).map(|(_, value)| value)
    }

    /// The value at `index`, downcast to `T`.
    ///
    /// ```rust
    /// use maniple::{Activator, Factory, FactoryActivator, KeyValueResolver, ParameterDescriptor, ServiceCollection};
    ///
    /// let factory = Factory::builder("double")
    ///     .parameter(ParameterDescriptor::untyped("n"))
    ///     .build(|args| Ok(*args.get::<u32>(0)? * 2));
    /// let activator = FactoryActivator::new(factory, KeyValueResolver::new().with("n", 21u32));
    ///
    /// let container = ServiceCollection::new().build();
    /// let value = activator.activate(&container).unwrap();
    /// assert_eq!(value.downcast_ref::<u32>(), Some(&42));
    /// ```
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        let (name, value) = self
            .entries
            .get(index)
            .ok_or_else(|| self.mismatch(&index.to_string()))?;
        value.clone().downcast::<T>().map_err(|_| self.mismatch(name))
    }

    /// The value bound to the parameter called `name`, downcast to `T`.
    pub fn named<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
        let (_, value) = self
            .entries
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| self.mismatch(name))?;
        value.clone().downcast::<T>().map_err(|_| self.mismatch(name))
    }

    /// Clones the value at `index` out of its `Arc`.
    pub fn cloned<T: Any + Send + Sync + Clone>(&self, index: usize) -> DiResult<T> {
        self.get::<T>(index).map(|value| (*value).clone())
    }

    fn mismatch(&self, parameter: &str) -> DiError {
        DiError::TypeMismatch(format!("{}::{}", self.context, parameter))
    }
}
