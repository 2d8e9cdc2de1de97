//! Interceptors around activations.
//!
//! A [`ServiceFilter`] receives the container and a [`Next`] continuation
//! standing for "the rest of the chain". Calling `next.activate` delegates;
//! returning without calling it short-circuits, so later filters and the
//! activator never run. Calling it more than once is allowed and retries
//! the rest of the chain.

use std::fmt;
use std::sync::Arc;

use crate::activator::Activator;
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

/// Middleware around an activation.
///
/// # Examples
///
/// ```rust
/// use maniple::{filter_fn, Container, DiError, ServiceCollection};
///
/// let mut services = ServiceCollection::new();
/// services.add_instance("secret", "hunter2".to_string());
/// services.add_filter_for("secret", filter_fn(|_, _| Err(DiError::vetoed("secret", "classified"))));
///
/// let container = services.build();
/// let err = container.get_as::<String>("secret").unwrap_err();
/// assert!(matches!(err.root_cause(), DiError::Vetoed { .. }));
/// ```
pub trait ServiceFilter: Send + Sync {
    fn filter(&self, services: &dyn ContainerCore, next: &Next<'_>) -> DiResult<AnyArc>;
}

impl<F> ServiceFilter for F
where
    F: Fn(&dyn ContainerCore, &Next<'_>) -> DiResult<AnyArc> + Send + Sync,
{
    fn filter(&self, services: &dyn ContainerCore, next: &Next<'_>) -> DiResult<AnyArc> {
        self(services, next)
    }
}

/// Pins a closure to the filter signature so its argument types are inferred.
pub fn filter_fn<F>(filter: F) -> F
where
    F: Fn(&dyn ContainerCore, &Next<'_>) -> DiResult<AnyArc> + Send + Sync,
{
    filter
}

/// The remainder of a filter chain: the filters not yet run, then the
/// activator they wrap.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    filters: &'a [Arc<dyn ServiceFilter>],
    activator: &'a dyn Activator,
}

impl<'a> Next<'a> {
    pub fn new(filters: &'a [Arc<dyn ServiceFilter>], activator: &'a dyn Activator) -> Self {
        Self { filters, activator }
    }

    /// Runs the next filter, or the wrapped activator once none are left.
    pub fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        match self.filters.split_first() {
            Some((filter, rest)) => filter.filter(services, &Next::new(rest, self.activator)),
            None => self.activator.activate(services),
        }
    }

    /// Filters still ahead of the activator.
    pub fn remaining(&self) -> usize {
        self.filters.len()
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.filters.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::FilteredActivator;
    use crate::error::DiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Empty;

    impl ContainerCore for Empty {
        fn has(&self, _id: &str) -> bool {
            false
        }

        fn get(&self, id: &str) -> DiResult<AnyArc> {
            Err(DiError::NotFound(id.to_string()))
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Activator for Counting {
        fn activate(&self, _services: &dyn ContainerCore) -> DiResult<AnyArc> {
            Ok(Arc::new(self.calls.fetch_add(1, Ordering::SeqCst)))
        }
    }

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ServiceFilter for Record {
        fn filter(&self, services: &dyn ContainerCore, next: &Next<'_>) -> DiResult<AnyArc> {
            self.log.lock().unwrap().push(self.name);
            next.activate(services)
        }
    }

    #[test]
    fn short_circuit_skips_activator_and_later_filters() {
        let inner = Arc::new(Counting::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        let filters: Vec<Arc<dyn ServiceFilter>> = vec![
            Arc::new(filter_fn(|_, _| Ok(Arc::new("fixed") as AnyArc))),
            Arc::new(Record { name: "later", log: log.clone() }),
        ];

        let value = FilteredActivator::new(inner.clone(), filters).activate(&Empty).unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"fixed"));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_chain_returns_activator_result() {
        let inner = Arc::new(Counting::default());
        let value = FilteredActivator::new(inner.clone(), Vec::new()).activate(&Empty).unwrap();
        assert_eq!(value.downcast_ref::<usize>(), Some(&0));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn filters_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let filters: Vec<Arc<dyn ServiceFilter>> = ["a", "b", "c"]
            .into_iter()
            .map(|name| Arc::new(Record { name, log: log.clone() }) as Arc<dyn ServiceFilter>)
            .collect();
        FilteredActivator::new(Arc::new(Counting::default()), filters)
            .activate(&Empty)
            .unwrap();
        assert_eq!(*log.lock().unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn next_may_be_called_repeatedly() {
        let inner = Arc::new(Counting::default());
        let twice = filter_fn(|services, next| {
            assert_eq!(next.remaining(), 0);
            next.activate(services)?;
            next.activate(services)
        });
        let filters: Vec<Arc<dyn ServiceFilter>> = vec![Arc::new(twice)];
        let value = FilteredActivator::new(inner.clone(), filters)
            .activate(&Empty)
            .unwrap();
        assert_eq!(value.downcast_ref::<usize>(), Some(&1));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn filter_errors_propagate() {
        let veto = filter_fn(|_, _| Err(DiError::vetoed("Car", "closed")));
        let filters: Vec<Arc<dyn ServiceFilter>> = vec![Arc::new(veto)];
        let result = FilteredActivator::new(Arc::new(Counting::default()), filters).activate(&Empty);
        assert!(matches!(result, Err(DiError::Vetoed { .. })));
    }
}
