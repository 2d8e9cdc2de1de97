use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use tracing::trace;

use super::Activator;
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

#[cfg(feature = "once-cell")]
type Slot = once_cell::sync::OnceCell<AnyArc>;
#[cfg(not(feature = "once-cell"))]
type Slot = std::sync::Mutex<Option<AnyArc>>;

/// Memoizes the first successful activation of the wrapped activator.
///
/// Concurrent first calls are serialized, so the wrapped activator completes
/// at most once. A failed activation stores nothing and the next call tries
/// again.
///
/// # Cycles
///
/// A call that re-enters the same `CachedActivator` on the thread that is
/// filling it bypasses the cache and runs the wrapped activator directly.
/// A dependency cycle through a singleton therefore recurses until the stack
/// is exhausted instead of deadlocking on the slot. Another thread re-entering
/// while the fill is in progress waits for it.
///
/// # Examples
///
/// ```rust
/// use maniple::{Activator, CachedActivator, Factory, FactoryActivator, NullResolver, ServiceCollection};
/// use std::sync::Arc;
///
/// let fresh = FactoryActivator::new(Factory::builder("list").build(|_| Ok(Vec::<u8>::new())), NullResolver);
/// let cached = CachedActivator::new(fresh);
///
/// let container = ServiceCollection::new().build();
/// let a = cached.activate(&container).unwrap();
/// let b = cached.activate(&container).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct CachedActivator {
    activator: Arc<dyn Activator>,
    slot: Slot,
    filler: Mutex<Option<ThreadId>>,
}

impl CachedActivator {
    pub fn new(activator: impl Activator + 'static) -> Self {
        Self::wrap(Arc::new(activator))
    }

    pub fn wrap(activator: Arc<dyn Activator>) -> Self {
        Self {
            activator,
            slot: Slot::default(),
            filler: Mutex::new(None),
        }
    }

    /// Whether a value has been stored.
    pub fn is_filled(&self) -> bool {
        #[cfg(feature = "once-cell")]
        {
            self.slot.get().is_some()
        }
        #[cfg(not(feature = "once-cell"))]
        {
            self.lock().is_some()
        }
    }

    #[cfg(not(feature = "once-cell"))]
    fn lock(&self) -> MutexGuard<'_, Option<AnyArc>> {
        // A panic inside the wrapped activator leaves the slot untouched.
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn filler(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.filler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the current thread is already inside `fill`.
    fn is_reentrant(&self) -> bool {
        *self.filler() == Some(thread::current().id())
    }

    fn fill(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        let _filling = Filling::enter(self);
        let value = self.activator.activate(services)?;
        trace!("cached activation result stored");
        Ok(value)
    }
}

impl Activator for CachedActivator {
    #[cfg(feature = "once-cell")]
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        if self.is_reentrant() {
            return self.activator.activate(services);
        }
        self.slot
            .get_or_try_init(|| self.fill(services))
            .map(Arc::clone)
    }

    #[cfg(not(feature = "once-cell"))]
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        if self.is_reentrant() {
            return self.activator.activate(services);
        }
        let mut slot = self.lock();
        if let Some(value) = slot.as_ref() {
            return Ok(value.clone());
        }
        let value = self.fill(services)?;
        *slot = Some(value.clone());
        Ok(value)
    }
}

/// Marks the current thread as the filler until dropped.
struct Filling<'a>(&'a CachedActivator);

impl<'a> Filling<'a> {
    fn enter(cached: &'a CachedActivator) -> Self {
        *cached.filler() = Some(thread::current().id());
        Filling(cached)
    }
}

impl Drop for Filling<'_> {
    fn drop(&mut self) {
        *self.0.filler() = None;
    }
}

impl fmt::Debug for CachedActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedActivator")
            .field("filled", &self.is_filled())
            .finish_non_exhaustive()
    }
}
