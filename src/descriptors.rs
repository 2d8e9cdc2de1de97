//! Introspected shapes of parameters, properties and constructible types.
//!
//! These are the values the introspection capability hands out. Activators
//! and resolvers only read them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::introspection::Arguments;
use crate::key::{container_type_name, service_id};
use crate::registration::AnyArc;

/// Shared shape of anything a resolver can supply a value for.
pub trait Member {
    /// Formal name of the parameter or property.
    fn name(&self) -> &str;
    /// Declared type name, if the member is typed.
    fn type_name(&self) -> Option<&str>;
}

/// One formal argument of a constructor or factory.
///
/// # Examples
///
/// ```rust
/// use maniple::{Member, ParameterDescriptor};
///
/// let engine = ParameterDescriptor::typed("engine", "Engine");
/// assert_eq!(engine.name(), "engine");
/// assert_eq!(engine.type_name(), Some("Engine"));
///
/// let size = ParameterDescriptor::untyped("size");
/// assert_eq!(size.type_name(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    name: String,
    type_name: Option<String>,
}

impl ParameterDescriptor {
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }

    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
        }
    }

    /// Parameter declared with a Rust type; its type name is [`service_id::<T>()`](service_id).
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::typed(name, service_id::<T>())
    }

    /// Parameter asking for the container itself.
    pub fn container(name: impl Into<String>) -> Self {
        Self::typed(name, container_type_name())
    }
}

impl Member for ParameterDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

/// One publicly settable field of a value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    name: String,
    type_name: Option<String>,
}

impl PropertyDescriptor {
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }

    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
        }
    }

    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::typed(name, service_id::<T>())
    }
}

impl Member for PropertyDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

type ConstructFn = Arc<dyn Fn(&Arguments) -> Result<AnyArc, BoxError> + Send + Sync>;
type DefaultFn = Arc<dyn Fn() -> Result<Box<dyn Any + Send + Sync>, BoxError> + Send + Sync>;
type SetterFn = Arc<dyn Fn(&mut (dyn Any + Send + Sync), &AnyArc) -> bool + Send + Sync>;

/// Ordered parameter list plus the function consuming the resolved arguments.
///
/// Shared by required constructors and by [`Factory`](crate::Factory) callables.
#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<ParameterDescriptor>,
    construct: ConstructFn,
}

impl Constructor {
    pub fn new<T, F>(parameters: Vec<ParameterDescriptor>, construct: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            parameters,
            construct: Arc::new(move |args: &Arguments| -> Result<AnyArc, BoxError> {
                Ok(Arc::new(construct(args)?))
            }),
        }
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub(crate) fn invoke(&self, args: &Arguments) -> Result<AnyArc, BoxError> {
        (self.construct)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// A settable property and the setter that assigns a resolved value to it.
#[derive(Clone)]
pub struct PropertySlot {
    descriptor: PropertyDescriptor,
    setter: SetterFn,
}

impl PropertySlot {
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// Returns `false` when either the target or the value has an unexpected type.
    pub(crate) fn assign(&self, target: &mut (dyn Any + Send + Sync), value: &AnyArc) -> bool {
        (self.setter)(target, value)
    }
}

/// Everything the engine knows about one constructible type.
///
/// A type is constructible when it has a required constructor, a zero-argument
/// default, or both. Properties are only used by
/// [`ValueObjectActivator`](crate::ValueObjectActivator).
///
/// # Examples
///
/// ```rust
/// use maniple::{ParameterDescriptor, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Engine { size: u32 }
/// struct Car { engine: Arc<Engine> }
///
/// let car: TypeDescriptor = TypeDescriptor::builder("Car")
///     .parameter(ParameterDescriptor::typed("engine", "Engine"))
///     .constructor(|args| Ok(Car { engine: args.get::<Engine>(0)? }))
///     .build();
///
/// assert!(car.is_constructible());
/// assert_eq!(car.constructor().unwrap().parameters().len(), 1);
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    constructor: Option<Constructor>,
    default: Option<DefaultFn>,
    properties: Vec<PropertySlot>,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            name: name.into(),
            parameters: Vec::new(),
            construct: None,
            default: None,
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The required constructor, if the type declares one.
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some() || self.default.is_some()
    }

    pub fn properties(&self) -> &[PropertySlot] {
        &self.properties
    }

    /// Builds a bare instance through the zero-argument default.
    ///
    /// Returns `None` when the type declares no default.
    pub(crate) fn instantiate(&self) -> Option<Result<Box<dyn Any + Send + Sync>, BoxError>> {
        self.default.as_ref().map(|default| default())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .field("has_default", &self.default.is_some())
            .field(
                "properties",
                &self.properties.iter().map(|p| p.descriptor.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`TypeDescriptor`].
pub struct TypeDescriptorBuilder {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    construct: Option<ConstructFn>,
    default: Option<DefaultFn>,
    properties: Vec<PropertySlot>,
}

impl TypeDescriptorBuilder {
    /// Appends a required constructor parameter. Order is declaration order.
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the required constructor consuming the declared parameters.
    pub fn constructor<T, F>(mut self, construct: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.construct = Some(Arc::new(move |args: &Arguments| -> Result<AnyArc, BoxError> {
            Ok(Arc::new(construct(args)?))
        }));
        self
    }

    /// Sets an infallible zero-argument default.
    pub fn default_with<T, F>(self, default: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.try_default_with(move || Ok(default()))
    }

    pub fn try_default_with<T, F>(mut self, default: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(
            move || -> Result<Box<dyn Any + Send + Sync>, BoxError> { Ok(Box::new(default()?)) },
        ));
        self
    }

    /// Declares a publicly settable property of `T` receiving values of type `V`.
    pub fn property<T, V, F>(mut self, descriptor: PropertyDescriptor, set: F) -> Self
    where
        T: Any + Send + Sync,
        V: Any + Send + Sync,
        F: Fn(&mut T, &V) + Send + Sync + 'static,
    {
        let setter: SetterFn = Arc::new(move |target: &mut (dyn Any + Send + Sync), value: &AnyArc| {
            match (target.downcast_mut::<T>(), (**value).downcast_ref::<V>()) {
                (Some(target), Some(value)) => {
                    set(target, value);
                    true
                }
                _ => false,
            }
        });
        self.properties.push(PropertySlot { descriptor, setter });
        self
    }

    /// Parameters declared without a constructor are dropped.
    pub fn build(self) -> TypeDescriptor {
        let parameters = self.parameters;
        TypeDescriptor {
            name: self.name,
            constructor: self.construct.map(|construct| Constructor { parameters, construct }),
            default: self.default,
            properties: self.properties,
        }
    }
}

impl From<TypeDescriptorBuilder> for TypeDescriptor {
    fn from(builder: TypeDescriptorBuilder) -> Self {
        builder.build()
    }
}
