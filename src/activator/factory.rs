//! Callable-based activation, inline or loaded from an external source.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{construct, Activator};
use crate::descriptors::{Constructor, ParameterDescriptor};
use crate::error::{BoxError, DiError, DiResult};
use crate::introspection::Arguments;
use crate::registration::AnyArc;
use crate::resolver::ParameterResolver;
use crate::traits::ContainerCore;

/// A named callable that describes its own parameters.
#[derive(Clone, Debug)]
pub struct Factory {
    name: String,
    constructor: Constructor,
}

impl Factory {
    pub fn builder(name: impl Into<String>) -> FactoryBuilder {
        FactoryBuilder {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        self.constructor.parameters()
    }
}

/// Builder for [`Factory`].
pub struct FactoryBuilder {
    name: String,
    parameters: Vec<ParameterDescriptor>,
}

impl FactoryBuilder {
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn build<T, F>(self, invoke: F) -> Factory
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Factory {
            name: self.name,
            constructor: Constructor::new(self.parameters, invoke),
        }
    }
}

/// Resolves a factory's parameters and invokes it.
///
/// Failure kinds match [`ClassActivator`](crate::ClassActivator), with the
/// factory's name as the context.
#[derive(Clone)]
pub struct FactoryActivator {
    factory: Factory,
    resolver: Arc<dyn ParameterResolver>,
}

impl FactoryActivator {
    pub fn new(factory: Factory, resolver: impl ParameterResolver + 'static) -> Self {
        Self::with_shared_resolver(factory, Arc::new(resolver))
    }

    pub fn with_shared_resolver(factory: Factory, resolver: Arc<dyn ParameterResolver>) -> Self {
        Self { factory, resolver }
    }
}

impl Activator for FactoryActivator {
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        construct(
            &self.factory.name,
            &self.factory.constructor,
            &*self.resolver,
            services,
        )
    }
}

impl fmt::Debug for FactoryActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryActivator")
            .field("factory", &self.factory.name)
            .finish_non_exhaustive()
    }
}

/// Turns an external source into exactly one [`Factory`].
pub trait FactoryLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Factory, BoxError>;
}

impl<F> FactoryLoader for F
where
    F: Fn(&Path) -> Result<Factory, BoxError> + Send + Sync,
{
    fn load(&self, path: &Path) -> Result<Factory, BoxError> {
        self(path)
    }
}

/// Loads its factory from a file on every activation.
///
/// Wrap it in a [`CachedActivator`](crate::CachedActivator) (register it as
/// a singleton) to load once.
///
/// # Errors
///
/// * [`DiError::SourceNotFound`] when `path` is not an existing file
/// * [`DiError::ConstructionFailure`] with the path as context when the
///   loader rejects the file
/// * Anything [`FactoryActivator`] fails with
#[derive(Clone)]
pub struct FileFactoryActivator {
    path: PathBuf,
    loader: Arc<dyn FactoryLoader>,
    resolver: Arc<dyn ParameterResolver>,
}

impl FileFactoryActivator {
    pub fn new(
        path: impl Into<PathBuf>,
        loader: Arc<dyn FactoryLoader>,
        resolver: impl ParameterResolver + 'static,
    ) -> Self {
        Self::with_shared_resolver(path, loader, Arc::new(resolver))
    }

    pub fn with_shared_resolver(
        path: impl Into<PathBuf>,
        loader: Arc<dyn FactoryLoader>,
        resolver: Arc<dyn ParameterResolver>,
    ) -> Self {
        Self {
            path: path.into(),
            loader,
            resolver,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> DiResult<Factory> {
        let location = self.path.display().to_string();
        if !self.path.is_file() {
            return Err(DiError::SourceNotFound(location));
        }
        debug!(path = %location, "loading factory");
        self.loader
            .load(&self.path)
            .map_err(|source| DiError::construction(location, source))
    }
}

impl Activator for FileFactoryActivator {
    fn activate(&self, services: &dyn ContainerCore) -> DiResult<AnyArc> {
        let factory = self.load()?;
        construct(&factory.name, &factory.constructor, &*self.resolver, services)
    }
}

impl fmt::Debug for FileFactoryActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileFactoryActivator")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "config")]
pub use catalog::FactoryCatalog;

#[cfg(feature = "config")]
mod catalog {
    use std::fs;
    use std::path::Path;

    use serde::Deserialize;

    use super::{Factory, FactoryLoader};
    use crate::error::BoxError;
    use crate::registration::ServiceMap;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Manifest {
        factory: String,
    }

    /// Named factories selected by a JSON manifest file.
    ///
    /// The manifest has the shape `{"factory": "<name>"}`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maniple::{Factory, FactoryCatalog, FactoryLoader};
    /// use std::io::Write;
    ///
    /// let mut catalog = FactoryCatalog::new();
    /// catalog.insert(Factory::builder("zero").build(|_| Ok(0u8)));
    ///
    /// let path = std::env::temp_dir().join("maniple-catalog-doc.json");
    /// std::fs::File::create(&path).unwrap().write_all(br#"{"factory":"zero"}"#).unwrap();
    ///
    /// assert_eq!(catalog.load(&path).unwrap().name(), "zero");
    /// # std::fs::remove_file(&path).ok();
    /// ```
    #[derive(Debug, Default, Clone)]
    pub struct FactoryCatalog {
        factories: ServiceMap<Factory>,
    }

    impl FactoryCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds or replaces the factory keyed by its own name.
        pub fn insert(&mut self, factory: Factory) -> &mut Self {
            self.factories.insert(factory.name().to_string(), factory);
            self
        }

        pub fn len(&self) -> usize {
            self.factories.len()
        }

        pub fn is_empty(&self) -> bool {
            self.factories.is_empty()
        }
    }

    impl FromIterator<Factory> for FactoryCatalog {
        fn from_iter<I: IntoIterator<Item = Factory>>(iter: I) -> Self {
            let mut catalog = Self::new();
            for factory in iter {
                catalog.insert(factory);
            }
            catalog
        }
    }

    impl FactoryLoader for FactoryCatalog {
        fn load(&self, path: &Path) -> Result<Factory, BoxError> {
            let manifest: Manifest = serde_json::from_str(&fs::read_to_string(path)?)?;
            self.factories
                .get(&manifest.factory)
                .cloned()
                .ok_or_else(|| format!("no factory named '{}'", manifest.factory).into())
        }
    }
}
