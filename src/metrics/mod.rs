//! Producer metric catalog and its registration with Prometheus.
//!
//! The catalog declares every metric, the factory turns each declaration into
//! a collector, the binder adds collectors to a registry, and the handle gives
//! the producer typed access to all of them.

pub mod catalog;
pub mod factory;
pub mod handle;
pub mod registry;
mod setup;

pub use catalog::{
    catalog, validate, MetricDescriptor, MetricId, MetricKind, SIZE_BYTE_BUCKETS,
    TIME_MILLISECOND_BUCKETS,
};
pub use factory::{build, effective_buckets, fq_name, Collector};
pub use handle::{assemble, HandleBuilder, LabeledCounter, LabeledDistribution, ProducerMetrics};
pub use registry::{Binder, MetricsRegistry};
pub use setup::{register_catalog, register_global, register_metrics, Registration};
