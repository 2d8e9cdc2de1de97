//! # maniple
//!
//! Service activation engine for dependency injection: given a service
//! identifier, pick an activation strategy, resolve its arguments through a
//! chain of resolvers and pass the outcome through interceptor filters.
//!
//! ## Features
//!
//! - **Pluggable activators**: stored instances, constructible types, value
//!   objects, inline and file-loaded factories
//! - **Resolver chains**: first success wins, with explicit overrides ahead
//!   of type-based lookup
//! - **Filters**: middleware that can delegate, retry, replace or veto
//! - **Implicit construction**: any known constructible type is a service
//! - **Thread-safe**: memoized singletons activate at most once
//!
//! ## Quick Start
//!
//! ```rust
//! use maniple::{Container, Lifetime, ParameterDescriptor, ServiceCollection, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Engine {
//!     size: u32,
//! }
//!
//! struct Car {
//!     engine: Arc<Engine>,
//! }
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .register_type(
//!         TypeDescriptor::builder("Car")
//!             .parameter(ParameterDescriptor::typed("engine", "Engine"))
//!             .constructor(|args| Ok(Car { engine: args.get::<Engine>(0)? })),
//!     )
//!     .add_instance("Engine", Engine { size: 1399 })
//!     .add_class("garage", "Car", Lifetime::Singleton);
//!
//! let container = services.build();
//!
//! // Implicit: "Car" is a known type, so it needs no registration.
//! let car = container.get_as::<Car>("Car").unwrap();
//! assert_eq!(car.engine.size, 1399);
//!
//! // Registered as a singleton: the same car every time.
//! let a = container.get_as::<Car>("garage").unwrap();
//! let b = container.get_as::<Car>("garage").unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```
//!
//! ## Filters
//!
//! ```rust
//! use maniple::{filter_fn, AnyArc, Container, ServiceCollection};
//! use std::sync::Arc;
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .add_instance("greeting", "Hello".to_string())
//!     .add_filter_for("greeting", filter_fn(|services, next| {
//!         let greeting = next.activate(services)?;
//!         let text = greeting.downcast_ref::<String>().cloned().unwrap_or_default();
//!         Ok(Arc::new(format!("{}, World!", text)) as AnyArc)
//!     }));
//!
//! let container = services.build();
//! assert_eq!(&*container.get_as::<String>("greeting").unwrap(), "Hello, World!");
//! ```
//!
//! ## Cargo features
//!
//! - `config` (default): [`FactoryCatalog`], a JSON-manifest [`FactoryLoader`]
//! - `once-cell`: lock-free reads of memoized singletons
//! - `ahash`: faster registry maps
//! - `performance`: `once-cell` and `ahash`
//! - `diagnostics`: [`ServiceContainer::to_debug_string`]

pub mod activator;
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod filter;
pub mod introspection;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod resolver;
pub mod traits;

mod registration;

pub use activator::{
    Activator, CachedActivator, ClassActivator, Factory, FactoryActivator, FactoryBuilder,
    FactoryLoader, FileFactoryActivator, FilteredActivator, InstanceActivator,
    ValueObjectActivator,
};
#[cfg(feature = "config")]
pub use activator::FactoryCatalog;
pub use collection::ServiceCollection;
pub use descriptors::{
    Constructor, Member, ParameterDescriptor, PropertyDescriptor, PropertySlot, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use error::{BoxError, DiError, DiResult};
pub use filter::{filter_fn, Next, ServiceFilter};
pub use introspection::{Arguments, TypeIntrospector, TypeRegistry};
pub use key::{container_type_name, service_id, GLOBAL_SCOPE};
pub use lifetime::Lifetime;
pub use observer::{ActivationObserver, LoggingObserver, MetricsObserver, MetricsSnapshot};
pub use provider::ServiceContainer;
pub use registration::AnyArc;
pub use resolver::{
    ContainerResolver, KeyValueResolver, NullResolver, ParameterChain, ParameterResolver,
    PropertyChain, PropertyResolver, ResolverChain, TypedResolver,
};
pub use traits::{Container, ContainerCore};
