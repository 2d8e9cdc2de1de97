//! Hooks for observing activations at the container boundary.
//!
//! Observers are called synchronously around every `get`, including the
//! nested ones a resolver makes. Keep implementations cheap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::DiError;

/// Observer of container activations.
///
/// # Examples
///
/// ```
/// use maniple::{ActivationObserver, DiError, ServiceCollection, ContainerCore};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Trail(Mutex<Vec<String>>);
///
/// impl ActivationObserver for Trail {
///     fn activating(&self, id: &str) {
///         self.0.lock().unwrap().push(format!("> {}", id));
///     }
///
///     fn activated(&self, id: &str, _elapsed: Duration) {
///         self.0.lock().unwrap().push(format!("< {}", id));
///     }
///
///     fn failed(&self, id: &str, _error: &DiError) {
///         self.0.lock().unwrap().push(format!("! {}", id));
///     }
/// }
///
/// let trail = Arc::new(Trail::default());
/// let mut services = ServiceCollection::new();
/// services.add_instance("greeting", "hi");
/// services.add_observer(trail.clone());
///
/// let container = services.build();
/// container.get("greeting").unwrap();
/// assert_eq!(*trail.0.lock().unwrap(), ["> greeting", "< greeting"]);
/// ```
pub trait ActivationObserver: Send + Sync {
    /// Called before the activator runs.
    fn activating(&self, id: &str);

    /// Called after a successful activation.
    fn activated(&self, id: &str, elapsed: Duration);

    /// Called with the unwrapped error when an activation fails.
    fn failed(&self, id: &str, error: &DiError);
}

/// Registered observers, notified in registration order.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ActivationObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ActivationObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn activating(&self, id: &str) {
        for observer in &self.observers {
            observer.activating(id);
        }
    }

    #[inline]
    pub(crate) fn activated(&self, id: &str, elapsed: Duration) {
        for observer in &self.observers {
            observer.activated(id, elapsed);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, id: &str, error: &DiError) {
        for observer in &self.observers {
            observer.failed(id, error);
        }
    }
}

/// Forwards activation events to `tracing` under the `maniple` target.
///
/// Successes are `debug` events, failures `warn`.
///
/// ```
/// use maniple::{LoggingObserver, ServiceCollection};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(LoggingObserver::new()));
/// let container = services.build();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ActivationObserver for LoggingObserver {
    fn activating(&self, id: &str) {
        debug!(target: "maniple", service = id, "activating");
    }

    fn activated(&self, id: &str, elapsed: Duration) {
        debug!(target: "maniple", service = id, ?elapsed, "activated");
    }

    fn failed(&self, id: &str, error: &DiError) {
        warn!(target: "maniple", service = id, %error, "activation failed");
    }
}

/// Counts activations and accumulates their time.
///
/// Nested activations are counted individually, and their time is also
/// included in the time of every enclosing activation.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    total_nanos: AtomicU64,
}

/// Point-in-time copy of [`MetricsObserver`] counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub total_time: Duration,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            total_time: Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed)),
        }
    }

    pub fn reset(&self) {
        self.started.store(0, Ordering::Relaxed);
        self.succeeded.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
    }
}

impl ActivationObserver for MetricsObserver {
    fn activating(&self, _id: &str) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    fn activated(&self, _id: &str, elapsed: Duration) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    fn failed(&self, _id: &str, _error: &DiError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_accumulate_and_reset() {
        let metrics = MetricsObserver::new();
        metrics.activating("a");
        metrics.activated("a", Duration::from_millis(2));
        metrics.activating("b");
        metrics.failed("b", &DiError::NotFound("b".into()));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.started, 2);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.total_time, Duration::from_millis(2));

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn observers_fan_out_in_order() {
        let first = Arc::new(MetricsObserver::new());
        let second = Arc::new(MetricsObserver::new());
        let mut observers = Observers::new();
        assert!(observers.is_empty());
        observers.add(first.clone());
        observers.add(second.clone());

        observers.activating("x");
        observers.activated("x", Duration::ZERO);
        assert_eq!(first.snapshot().succeeded, 1);
        assert_eq!(second.snapshot().succeeded, 1);
    }
}
