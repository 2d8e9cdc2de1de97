//! The registration API.
//!
//! [`ServiceCollection`] gathers activators, filters, types and observers,
//! then [`build`](ServiceCollection::build)s an immutable
//! [`ServiceContainer`].

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::activator::{
    Activator, CachedActivator, ClassActivator, Factory, FactoryActivator, FactoryLoader,
    FileFactoryActivator, InstanceActivator, ValueObjectActivator,
};
use crate::descriptors::TypeDescriptor;
use crate::error::BoxError;
use crate::filter::ServiceFilter;
use crate::introspection::{TypeIntrospector, TypeRegistry};
use crate::key::{service_id, GLOBAL_SCOPE};
use crate::lifetime::Lifetime;
use crate::observer::{ActivationObserver, Observers};
use crate::provider::ServiceContainer;
use crate::registration::Registry;
use crate::resolver::{
    ContainerResolver, KeyValueResolver, ParameterChain, ParameterResolver, PropertyChain,
    PropertyResolver, TypedResolver,
};

/// Collaborators shared by every registration, fixed when the collection is built.
pub(crate) struct Defaults {
    pub(crate) types: Arc<dyn TypeIntrospector>,
    pub(crate) parameters: Arc<dyn ParameterResolver>,
    pub(crate) properties: Arc<dyn PropertyResolver>,
    pub(crate) loader: Arc<dyn FactoryLoader>,
}

type Pending = Box<dyn FnOnce(&Defaults) -> Arc<dyn Activator> + Send>;

/// Registration API producing a [`ServiceContainer`].
///
/// Registrations that depend on the type table or the default resolvers are
/// completed at [`build`](Self::build), so the order of configuration calls
/// does not matter. Registering an identifier twice keeps the later one.
///
/// # Examples
///
/// ```rust
/// use maniple::{Container, Lifetime, ParameterDescriptor, ServiceCollection, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Engine { size: u32 }
/// struct Car { engine: Arc<Engine> }
///
/// let mut services = ServiceCollection::new();
/// services
///     .register_type(
///         TypeDescriptor::builder("Car")
///             .parameter(ParameterDescriptor::typed("engine", "Engine"))
///             .constructor(|args| Ok(Car { engine: args.get::<Engine>(0)? })),
///     )
///     .add_instance("Engine", Engine { size: 1399 });
///
/// let container = services.build();
/// let car = container.get_as::<Car>("Car").unwrap();
/// assert_eq!(car.engine.size, 1399);
/// ```
pub struct ServiceCollection {
    pending: Vec<(String, Pending)>,
    filters: Vec<(String, Arc<dyn ServiceFilter>)>,
    observers: Observers,
    types: TypeRegistry,
    external_types: Option<Arc<dyn TypeIntrospector>>,
    parameters: Arc<dyn ParameterResolver>,
    properties: Arc<dyn PropertyResolver>,
    loader: Option<Arc<dyn FactoryLoader>>,
}

impl ServiceCollection {
    /// Empty collection with the default resolvers.
    ///
    /// Parameters are resolved by `[ContainerResolver, TypedResolver]`,
    /// properties by `[TypedResolver]`.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            filters: Vec::new(),
            observers: Observers::new(),
            types: TypeRegistry::new(),
            external_types: None,
            parameters: Arc::new(ParameterChain::new().with(ContainerResolver).with(TypedResolver)),
            properties: Arc::new(PropertyChain::new().with(TypedResolver)),
            loader: None,
        }
    }

    // ----- Configuration -----

    /// Replaces the default parameter resolver.
    pub fn with_parameter_resolver(&mut self, resolver: impl ParameterResolver + 'static) -> &mut Self {
        self.parameters = Arc::new(resolver);
        self
    }

    /// Replaces the default property resolver.
    pub fn with_property_resolver(&mut self, resolver: impl PropertyResolver + 'static) -> &mut Self {
        self.properties = Arc::new(resolver);
        self
    }

    /// Replaces the type table.
    ///
    /// Types added with [`register_type`](Self::register_type) are still
    /// consulted, ahead of `types`. A local descriptor with neither a
    /// constructor nor a default does not hide a constructible one in `types`.
    pub fn with_types(&mut self, types: Arc<dyn TypeIntrospector>) -> &mut Self {
        self.external_types = Some(types);
        self
    }

    /// Loader used by [`add_file_factory`](Self::add_file_factory).
    pub fn with_factory_loader(&mut self, loader: Arc<dyn FactoryLoader>) -> &mut Self {
        self.loader = Some(loader);
        self
    }

    /// Makes a type known for class and value-object activation.
    ///
    /// Known types are also resolved implicitly by their name.
    pub fn register_type(&mut self, descriptor: impl Into<TypeDescriptor>) -> &mut Self {
        self.types.register(descriptor);
        self
    }

    // ----- Activators -----

    /// Registers `activator` under `id`; singletons are memoized.
    pub fn add_activator(
        &mut self,
        id: impl Into<String>,
        activator: impl Activator + 'static,
        lifetime: Lifetime,
    ) -> &mut Self {
        let activator: Arc<dyn Activator> = Arc::new(activator);
        self.defer(id, lifetime, move |_| activator)
    }

    /// Registers a value returned as-is by every `get`.
    pub fn add_instance<T: Any + Send + Sync>(&mut self, id: impl Into<String>, value: T) -> &mut Self {
        self.add_activator(id, InstanceActivator::new(value), Lifetime::Transient)
    }

    /// Registers a value under its own type name.
    ///
    /// ```rust
    /// use maniple::{Container, ServiceCollection};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_instance_of(String::from("Hello, World!"));
    ///
    /// let container = services.build();
    /// assert_eq!(&*container.get_of::<String>().unwrap(), "Hello, World!");
    /// ```
    pub fn add_instance_of<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.add_instance(service_id::<T>(), value)
    }

    /// Registers construction of `type_name` through the default parameter resolver.
    pub fn add_class(
        &mut self,
        id: impl Into<String>,
        type_name: impl Into<String>,
        lifetime: Lifetime,
    ) -> &mut Self {
        let type_name = type_name.into();
        self.defer(id, lifetime, move |defaults| {
            Arc::new(ClassActivator::with_shared_resolver(
                type_name,
                defaults.types.clone(),
                defaults.parameters.clone(),
            ))
        })
    }

    /// Like [`add_class`](Self::add_class), with named parameter overrides
    /// tried before the default resolver.
    pub fn add_class_with(
        &mut self,
        id: impl Into<String>,
        type_name: impl Into<String>,
        lifetime: Lifetime,
        overrides: KeyValueResolver,
    ) -> &mut Self {
        let type_name = type_name.into();
        self.defer(id, lifetime, move |defaults| {
            Arc::new(ClassActivator::with_shared_resolver(
                type_name,
                defaults.types.clone(),
                overridden_parameters(overrides, defaults),
            ))
        })
    }

    /// Registers a value object filled through the default property resolver.
    pub fn add_value_object(
        &mut self,
        id: impl Into<String>,
        type_name: impl Into<String>,
        lifetime: Lifetime,
    ) -> &mut Self {
        let type_name = type_name.into();
        self.defer(id, lifetime, move |defaults| {
            Arc::new(ValueObjectActivator::with_shared_resolver(
                type_name,
                defaults.types.clone(),
                defaults.properties.clone(),
            ))
        })
    }

    /// Like [`add_value_object`](Self::add_value_object), with named property
    /// overrides tried before the default resolver.
    ///
    /// ```rust
    /// use maniple::{Container, KeyValueResolver, Lifetime, PropertyDescriptor, ServiceCollection, TypeDescriptor};
    ///
    /// #[derive(Default)]
    /// struct Person { age: i32, name: String }
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .register_type(
    ///         TypeDescriptor::builder("Person")
    ///             .default_with(Person::default)
    ///             .property(PropertyDescriptor::untyped("age"), |p: &mut Person, v: &i32| p.age = *v)
    ///             .property(PropertyDescriptor::untyped("name"), |p: &mut Person, v: &String| p.name = v.clone()),
    ///     )
    ///     .add_value_object_with(
    ///         "alice",
    ///         "Person",
    ///         Lifetime::Transient,
    ///         KeyValueResolver::new().with("age", 33i32).with("name", "Alice".to_string()),
    ///     );
    ///
    /// let alice = services.build().get_as::<Person>("alice").unwrap();
    /// assert_eq!((alice.age, alice.name.as_str()), (33, "Alice"));
    /// ```
    pub fn add_value_object_with(
        &mut self,
        id: impl Into<String>,
        type_name: impl Into<String>,
        lifetime: Lifetime,
        overrides: KeyValueResolver,
    ) -> &mut Self {
        let type_name = type_name.into();
        self.defer(id, lifetime, move |defaults| {
            let mut chain = PropertyChain::new();
            chain.push(Arc::new(overrides)).push(defaults.properties.clone());
            Arc::new(ValueObjectActivator::with_shared_resolver(
                type_name,
                defaults.types.clone(),
                Arc::new(chain),
            ))
        })
    }

    /// Registers an inline factory resolved through the default parameter resolver.
    pub fn add_factory(&mut self, id: impl Into<String>, factory: Factory, lifetime: Lifetime) -> &mut Self {
        self.defer(id, lifetime, move |defaults| {
            Arc::new(FactoryActivator::with_shared_resolver(
                factory,
                defaults.parameters.clone(),
            ))
        })
    }

    pub fn add_factory_with(
        &mut self,
        id: impl Into<String>,
        factory: Factory,
        lifetime: Lifetime,
        overrides: KeyValueResolver,
    ) -> &mut Self {
        self.defer(id, lifetime, move |defaults| {
            Arc::new(FactoryActivator::with_shared_resolver(
                factory,
                overridden_parameters(overrides, defaults),
            ))
        })
    }

    /// Registers a factory loaded from `path` by the configured
    /// [`FactoryLoader`].
    ///
    /// Without a loader every activation fails with a construction failure.
    pub fn add_file_factory(
        &mut self,
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        lifetime: Lifetime,
    ) -> &mut Self {
        let path = path.into();
        self.defer(id, lifetime, move |defaults| {
            Arc::new(FileFactoryActivator::with_shared_resolver(
                path,
                defaults.loader.clone(),
                defaults.parameters.clone(),
            ))
        })
    }

    pub fn add_file_factory_with(
        &mut self,
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        lifetime: Lifetime,
        overrides: KeyValueResolver,
    ) -> &mut Self {
        let path = path.into();
        self.defer(id, lifetime, move |defaults| {
            Arc::new(FileFactoryActivator::with_shared_resolver(
                path,
                defaults.loader.clone(),
                overridden_parameters(overrides, defaults),
            ))
        })
    }

    // ----- Filters and observers -----

    /// Adds a filter applied to every activation.
    pub fn add_filter(&mut self, filter: impl ServiceFilter + 'static) -> &mut Self {
        self.add_filter_for(GLOBAL_SCOPE, filter)
    }

    /// Adds a filter applied to activations of `scope` only.
    ///
    /// Filters run in registration order, global ones first.
    pub fn add_filter_for(&mut self, scope: impl Into<String>, filter: impl ServiceFilter + 'static) -> &mut Self {
        self.filters.push((scope.into(), Arc::new(filter)));
        self
    }

    pub fn add_observer(&mut self, observer: Arc<dyn ActivationObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Completes every registration and produces the container.
    pub fn build(self) -> ServiceContainer {
        let local: Arc<dyn TypeIntrospector> = Arc::new(self.types);
        let types: Arc<dyn TypeIntrospector> = match self.external_types {
            Some(external) => Arc::new(Layered([local, external])),
            None => local,
        };
        let loader: Arc<dyn FactoryLoader> = match self.loader {
            Some(loader) => loader,
            None => Arc::new(NoLoader),
        };
        let defaults = Defaults {
            types,
            parameters: self.parameters,
            properties: self.properties,
            loader,
        };

        let mut registry = Registry::new();
        for (id, complete) in self.pending {
            registry.insert(id, complete(&defaults));
        }
        for (scope, filter) in self.filters {
            registry.push_filter(scope, filter);
        }

        ServiceContainer::new(registry, defaults, self.observers)
    }

    fn defer<F>(&mut self, id: impl Into<String>, lifetime: Lifetime, complete: F) -> &mut Self
    where
        F: FnOnce(&Defaults) -> Arc<dyn Activator> + Send + 'static,
    {
        let complete: Pending = Box::new(move |defaults| {
            let activator = complete(defaults);
            if lifetime.is_cached() {
                Arc::new(CachedActivator::wrap(activator))
            } else {
                activator
            }
        });
        self.pending.push((id.into(), complete));
        self
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// `overrides` first, then the collection's parameter resolver.
fn overridden_parameters(overrides: KeyValueResolver, defaults: &Defaults) -> Arc<dyn ParameterResolver> {
    let mut chain = ParameterChain::new();
    chain.push(Arc::new(overrides)).push(defaults.parameters.clone());
    Arc::new(chain)
}

/// Type tables consulted in order.
struct Layered([Arc<dyn TypeIntrospector>; 2]);

impl TypeIntrospector for Layered {
    fn describe(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        let mut found = self.0.iter().filter_map(|types| types.describe(type_name));
        let first = found.next()?;
        if first.is_constructible() {
            return Some(first);
        }
        found.find(|descriptor| descriptor.is_constructible()).or(Some(first))
    }
}

struct NoLoader;

impl FactoryLoader for NoLoader {
    fn load(&self, _path: &Path) -> Result<Factory, BoxError> {
        Err("no factory loader configured".into())
    }
}
