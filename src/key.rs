//! Service identifiers and filter scopes.
//!
//! Services are keyed by opaque strings. Most identifiers are type names,
//! either chosen by hand (`"Engine"`) or derived with [`service_id`].

use crate::traits::ContainerCore;

/// Filter scope applied to every activation, ahead of identifier scopes.
pub const GLOBAL_SCOPE: &str = "*";

/// Identifier derived from a Rust type.
///
/// ```rust
/// use maniple::service_id;
///
/// assert_eq!(service_id::<String>(), "alloc::string::String");
/// ```
#[inline]
pub fn service_id<T: ?Sized + 'static>() -> &'static str {
    std::any::type_name::<T>()
}

/// Declared type name that marks a parameter as wanting the container itself.
#[inline]
pub fn container_type_name() -> &'static str {
    service_id::<dyn ContainerCore>()
}

/// Ordered filter scopes consulted for one identifier.
pub(crate) fn scopes_for(id: &str) -> impl Iterator<Item = &str> {
    std::iter::once(GLOBAL_SCOPE).chain((id != GLOBAL_SCOPE).then_some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_scope_comes_first() {
        assert_eq!(scopes_for("Car").collect::<Vec<_>>(), ["*", "Car"]);
    }

    #[test]
    fn global_scope_is_not_visited_twice() {
        assert_eq!(scopes_for("*").collect::<Vec<_>>(), ["*"]);
    }

    #[test]
    fn container_type_name_names_the_trait() {
        assert!(container_type_name().contains("ContainerCore"));
    }
}
