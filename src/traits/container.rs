//! Container traits consumed by activators, resolvers and filters.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::service_id;
use crate::registration::AnyArc;

/// Object-safe container interface.
///
/// This is the only view of a container that activators, resolvers and
/// filters receive, so any type implementing it can stand in for the real
/// [`ServiceContainer`](crate::ServiceContainer) (tests use tiny fixed
/// containers).
///
/// Most callers want the typed helpers of [`Container`] instead.
pub trait ContainerCore: Send + Sync {
    /// Whether `id` is registered or names a constructible type.
    fn has(&self, id: &str) -> bool;

    /// Produces the service registered under `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The activated instance
    /// * `Err(DiError::NotFound)` - Nothing registered and not constructible
    /// * `Err(DiError::ActivationFailure)` - The activation itself failed
    fn get(&self, id: &str) -> DiResult<AnyArc>;

    /// An owned handle to this container, if it can hand one out.
    ///
    /// Used by [`ContainerResolver`](crate::ContainerResolver) to inject the
    /// container into the services it builds.
    fn share(&self) -> Option<Arc<dyn ContainerCore>> {
        None
    }
}

/// Typed helpers over [`ContainerCore`], available on every container.
///
/// # Examples
///
/// ```
/// use maniple::{Container, ServiceCollection};
///
/// let mut services = ServiceCollection::new();
/// services.add_instance("greeting", "Hello, World!".to_string());
///
/// let container = services.build();
/// let greeting = container.get_as::<String>("greeting").unwrap();
/// assert_eq!(&*greeting, "Hello, World!");
///
/// assert!(container.get_as::<u32>("greeting").is_err());
/// ```
pub trait Container: ContainerCore {
    /// Resolves `id` and downcasts it to `T`.
    fn get_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Arc<T>> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(id.to_string()))
    }

    /// Resolves the service keyed by `T`'s own type name.
    fn get_of<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        self.get_as::<T>(service_id::<T>())
    }

    /// Resolves `id` as `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the service cannot be activated or is not a `T`.
    fn get_required<T: Any + Send + Sync>(&self, id: &str) -> Arc<T> {
        match self.get_as::<T>(id) {
            Ok(service) => service,
            Err(e) => panic!("Failed to resolve '{}': {}", id, e),
        }
    }
}

impl<C: ContainerCore + ?Sized> Container for C {}
