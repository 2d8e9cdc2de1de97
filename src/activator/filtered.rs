use std::fmt;
use std::sync::Arc;

use super::Activator;
use crate::error::DiResult;
use crate::filter::{Next, ServiceFilter};
use crate::registration::AnyArc;
use crate::traits::ContainerCore;

/// Runs an activator behind an ordered filter chain.
///
/// The first filter receives a continuation over the remaining filters and
/// the wrapped activator. With no filters the wrapped activator runs
/// directly.
#[derive(Clone)]
pub struct FilteredActivator {
    activator: Arc<dyn Activator>,
    filters: Vec<Arc<dyn ServiceFilter>>,
}

impl FilteredActivator {
    pub fn new(activator: Arc<dyn Activator>, filters: Vec<Arc<dyn ServiceFilter>>) -> Self {
        Self { activator, filters }
    }

    pub fn filters(&self) -> &[Arc<dyn ServiceFilter>] {
        &self.filters
    }
}

impl Activator for FilteredActivator {
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        Next::new(&self.filters, &*self.activator).activate(services)
    }
}

impl fmt::Debug for FilteredActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredActivator")
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}
