//! Error types for kinesis-producer-metrics.

use thiserror::Error;

/// Defects in the metric catalog itself.
///
/// These are programming errors: the shipped catalog is internally
/// inconsistent and the producer should not start.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two descriptors share the same id.
    #[error("metric id {0} is declared more than once")]
    DuplicateId(&'static str),

    /// Two descriptors share the same external name.
    #[error("metric name {0} is declared more than once")]
    DuplicateName(&'static str),

    /// A descriptor has no help text.
    #[error("metric {0} has an empty description")]
    EmptyDescription(&'static str),

    /// A label name appears twice in one descriptor.
    #[error("metric {id} declares label {label} more than once")]
    DuplicateLabel { id: &'static str, label: &'static str },

    /// Bucket boundaries were declared on a counter.
    #[error("counter {0} declares bucket boundaries")]
    BucketsOnCounter(&'static str),

    /// Bucket boundaries are not positive, finite and strictly increasing.
    #[error("metric {0} has bucket boundaries that are not positive and strictly increasing")]
    InvalidBuckets(&'static str),

    /// A descriptor's kind does not match the handle field it feeds.
    #[error("metric {id} is a {found} but its handle field expects a {expected}")]
    KindMismatch {
        id: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A descriptor's label count does not match the handle field it feeds.
    #[error("metric {id} declares {declared} labels but its handle field takes {expected}")]
    LabelArity {
        id: &'static str,
        expected: usize,
        declared: usize,
    },

    /// A handle field has no descriptor in the catalog.
    #[error("metric {0} is missing from the catalog")]
    MissingMetric(&'static str),

    /// The collector runtime refused the descriptor (bad metric or label name).
    #[error("metric {id} could not be constructed: {source}")]
    Collector {
        id: &'static str,
        #[source]
        source: prometheus::Error,
    },
}

/// A collector could not be added to the registry.
///
/// Never fatal: the collector is still returned in the handle and keeps
/// recording, it is only absent from the registry's export surface.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A collector with the same descriptor is already registered.
    #[error("{name} is already registered")]
    Conflict {
        name: String,
        #[source]
        source: prometheus::Error,
    },

    /// The registry refused the collector for any other reason.
    #[error("{name} was rejected by the registry: {source}")]
    Rejected {
        name: String,
        #[source]
        source: prometheus::Error,
    },
}

impl RegistrationError {
    pub(crate) fn new(name: impl Into<String>, source: prometheus::Error) -> Self {
        let name = name.into();
        match source {
            prometheus::Error::AlreadyReg => RegistrationError::Conflict { name, source },
            source => RegistrationError::Rejected { name, source },
        }
    }

    /// Fully-qualified name of the metric that failed to register.
    pub fn name(&self) -> &str {
        match self {
            RegistrationError::Conflict { name, .. } | RegistrationError::Rejected { name, .. } => {
                name
            }
        }
    }

    /// True when the failure was a duplicate registration.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RegistrationError::Conflict { .. })
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
