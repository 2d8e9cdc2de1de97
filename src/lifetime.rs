//! Registration lifetimes.

/// Whether a registered activator is memoized.
///
/// The registration API wraps `Singleton` activators in a
/// [`CachedActivator`](crate::CachedActivator); `Transient` activators run on
/// every `get`.
///
/// # Examples
///
/// ```rust
/// use maniple::{ContainerCore, Lifetime, ServiceCollection, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// let mut services = ServiceCollection::new();
/// services.register_type(TypeDescriptor::builder("Clock").default_with(|| Clock));
/// services.add_class("shared", "Clock", Lifetime::Singleton);
/// services.add_class("fresh", "Clock", Lifetime::Transient);
///
/// let container = services.build();
/// let a = container.get("shared").unwrap();
/// let b = container.get("shared").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let c = container.get("fresh").unwrap();
/// let d = container.get("fresh").unwrap();
/// assert!(!Arc::ptr_eq(&c, &d));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Activated once, the same instance returned afterwards
    Singleton,
    /// Activated on every request
    #[default]
    Transient,
}

impl Lifetime {
    #[inline]
    pub fn is_cached(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}
