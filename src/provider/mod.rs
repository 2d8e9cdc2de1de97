//! The container façade.
//!
//! [`ServiceContainer`] maps identifiers to activators, falls back to
//! implicit construction for known types, applies filters and reports
//! every failure from behind one error kind.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::activator::{Activator, ClassActivator, FilteredActivator};
use crate::collection::Defaults;
use crate::error::{DiError, DiResult};
use crate::observer::Observers;
use crate::registration::{AnyArc, Registry};
use crate::traits::ContainerCore;

/// Immutable container built by [`ServiceCollection`](crate::ServiceCollection).
///
/// Cloning is cheap and every clone shares the same registrations and
/// memoized singletons.
///
/// # Errors
///
/// `get` fails with [`DiError::NotFound`] when `id` is neither registered
/// nor a known constructible type. Any other failure is reported as
/// [`DiError::ActivationFailure`] naming `id`, with the original error as
/// its source. Failures in nested activations are wrapped once per level.
///
/// # Examples
///
/// ```
/// use maniple::{Container, ContainerCore, DiError, ParameterDescriptor, ServiceCollection, TypeDescriptor};
///
/// struct Car;
///
/// let mut services = ServiceCollection::new();
/// services.register_type(
///     TypeDescriptor::builder("Car")
///         .parameter(ParameterDescriptor::typed("engine", "Engine"))
///         .constructor(|_| Ok(Car)),
/// );
/// let container = services.build();
///
/// assert!(container.has("Car"));
/// assert!(!container.has("Engine"));
///
/// match container.get("Car") {
///     Err(DiError::ActivationFailure { id, source }) => {
///         assert_eq!(id, "Car");
///         assert!(matches!(*source, DiError::UnresolvableParameter { .. }));
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    registry: Registry,
    defaults: Defaults,
    observers: Observers,
}

impl ServiceContainer {
    pub(crate) fn new(registry: Registry, defaults: Defaults, observers: Observers) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry,
                defaults,
                observers,
            }),
        }
    }

    /// Number of explicitly registered identifiers.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locate(&self, id: &str) -> DiResult<Arc<dyn Activator>> {
        if let Some(activator) = self.inner.registry.get(id) {
            return Ok(activator.clone());
        }
        let defaults = &self.inner.defaults;
        if defaults.types.can_construct(id) {
            debug!(service = id, "activating unregistered type");
            return Ok(Arc::new(ClassActivator::with_shared_resolver(
                id,
                defaults.types.clone(),
                defaults.parameters.clone(),
            )));
        }
        Err(DiError::NotFound(id.to_string()))
    }

    fn activate(&self, id: &str, activator: Arc<dyn Activator>) -> DiResult<AnyArc> {
        let filters = self.inner.registry.filters_for(id);
        if filters.is_empty() {
            activator.activate(self)
        } else {
            FilteredActivator::new(activator, filters).activate(self)
        }
    }

    /// Lists registrations and filter scopes, sorted by name.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        use std::fmt::Write;

        let registry = &self.inner.registry;
        let mut ids: Vec<&str> = registry.ids().collect();
        ids.sort_unstable();
        let mut scopes: Vec<(&str, usize)> = registry.filter_scopes().collect();
        scopes.sort_unstable();

        let mut out = String::new();
        let _ = writeln!(out, "ServiceContainer ({} registrations)", registry.len());
        for id in ids {
            let _ = writeln!(out, "  service {}", id);
        }
        for (scope, count) in scopes {
            let _ = writeln!(out, "  filters {} x{}", scope, count);
        }
        out
    }
}

impl ContainerCore for ServiceContainer {
    fn has(&self, id: &str) -> bool {
        self.inner.registry.contains(id) || self.inner.defaults.types.can_construct(id)
    }

    fn get(&self, id: &str) -> DiResult<AnyArc> {
        let activator = self.locate(id)?;
        let observers = &self.inner.observers;

        if observers.is_empty() {
            return self.activate(id, activator).map_err(|e| wrap(id, e));
        }

        observers.activating(id);
        let started = Instant::now();
        match self.activate(id, activator) {
            Ok(service) => {
                observers.activated(id, started.elapsed());
                Ok(service)
            }
            Err(e) => {
                observers.failed(id, &e);
                Err(wrap(id, e))
            }
        }
    }

    fn share(&self) -> Option<Arc<dyn ContainerCore>> {
        Some(Arc::new(self.clone()))
    }
}

fn wrap(id: &str, source: DiError) -> DiError {
    DiError::ActivationFailure {
        id: id.to_string(),
        source: Box::new(source),
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("registrations", &self.inner.registry.len())
            .finish_non_exhaustive()
    }
}
