//! Error types for the activation engine.

use thiserror::Error;

/// Boxed error produced by constructors, factories and loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Activation errors
///
/// Resolvers never produce these for an ordinary "cannot supply" outcome;
/// only activators, filters and the container boundary do.
///
/// # Examples
///
/// ```rust
/// use maniple::{DiError, ServiceCollection, ContainerCore};
///
/// let container = ServiceCollection::new().build();
/// match container.get("Missing") {
///     Err(DiError::NotFound(id)) => assert_eq!(id, "Missing"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use maniple::DiError;
///
/// let unresolved = DiError::UnresolvableParameter {
///     context: "Car".to_string(),
///     name: "engine".to_string(),
/// };
/// assert_eq!(unresolved.to_string(), "Unresolvable parameter: 'Car::engine'");
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// No registration and not a constructible type
    #[error("Service not found: '{0}'")]
    NotFound(String),

    /// A required constructor or factory parameter had no resolver success
    #[error("Unresolvable parameter: '{context}::{name}'")]
    UnresolvableParameter { context: String, name: String },

    /// External callable source is absent
    #[error("Factory source not found: '{0}'")]
    SourceNotFound(String),

    /// The construction step itself raised
    #[error("Construction of '{context}' failed: {source}")]
    ConstructionFailure {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Container-level umbrella wrapping whatever escaped an activation
    #[error("Activation of '{id}' failed: {source}")]
    ActivationFailure {
        id: String,
        #[source]
        source: Box<DiError>,
    },

    /// Stored value is not of the requested type
    #[error("Type mismatch for: '{0}'")]
    TypeMismatch(String),

    /// A filter refused the activation
    #[error("Activation of '{id}' vetoed: {reason}")]
    Vetoed { id: String, reason: String },
}

impl DiError {
    /// Wraps an arbitrary construction error.
    pub fn construction(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DiError::ConstructionFailure {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Shorthand for filters refusing an activation.
    pub fn vetoed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        DiError::Vetoed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::NotFound(_))
    }

    /// Walks nested `ActivationFailure` layers down to the originating error.
    ///
    /// ```rust
    /// use maniple::DiError;
    ///
    /// let inner = DiError::SourceNotFound("car.json".to_string());
    /// let outer = DiError::ActivationFailure {
    ///     id: "Garage".to_string(),
    ///     source: Box::new(DiError::ActivationFailure {
    ///         id: "Car".to_string(),
    ///         source: Box::new(inner),
    ///     }),
    /// };
    /// assert!(matches!(outer.root_cause(), DiError::SourceNotFound(_)));
    /// ```
    pub fn root_cause(&self) -> &DiError {
        let mut current = self;
        while let DiError::ActivationFailure { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Result type for activation operations
pub type DiResult<T> = Result<T, DiError>;
