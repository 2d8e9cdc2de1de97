use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::Activator;
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

/// Returns a precomputed value on every activation.
#[derive(Clone)]
pub struct InstanceActivator {
    value: AnyArc,
}

impl InstanceActivator {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_shared(Arc::new(value))
    }

    /// Wraps a value that is already shared, keeping its identity.
    pub fn from_shared(value: AnyArc) -> Self {
        Self { value }
    }
}

impl Activator for InstanceActivator {
    fn activate(&self, _services: &dyn ContainerCore) -> DiResult<AnyArc> {
        Ok(self.value.clone())
    }
}

impl fmt::Debug for InstanceActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceActivator").finish_non_exhaustive()
    }
}
