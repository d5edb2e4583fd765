//! One-shot registration pipeline run at producer startup.
//!
//! catalog -> factory -> binder -> handle. Must run once per registry: a second
//! run against the same registry reports a conflict for every metric.

use tracing::{debug, info};

use super::catalog::{catalog, validate, MetricDescriptor};
use super::factory::{build, Collector};
use super::handle::{assemble, ProducerMetrics};
use super::registry::{Binder, MetricsRegistry};
use crate::config::MetricsConfig;
use crate::error::{RegistrationError, Result};
use crate::utils::logger::{Logger, TracingLogger};

/// Outcome of a registration run.
#[derive(Debug)]
pub struct Registration {
    /// Fully populated, whether or not every collector was registered.
    pub metrics: ProducerMetrics,
    /// Collectors missing from the registry's export surface.
    pub failures: Vec<RegistrationError>,
}

impl Registration {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registers the shipped catalog.
pub fn register_metrics(
    config: &MetricsConfig,
    registry: &dyn MetricsRegistry,
    logger: &dyn Logger,
) -> Result<Registration> {
    register_catalog(&catalog(), config, registry, logger)
}

/// Registers the shipped catalog with [`prometheus::default_registry`],
/// logging failures through `tracing`.
pub fn register_global(config: &MetricsConfig) -> Result<Registration> {
    register_metrics(config, prometheus::default_registry(), &TracingLogger)
}

/// Validates `descriptors`, builds a collector for each, assembles the
/// handle, and only then registers the collectors.
///
/// Catalog defects abort with `Err` before anything reaches the registry.
/// Registration failures are logged, collected and skipped.
pub fn register_catalog(
    descriptors: &[MetricDescriptor],
    config: &MetricsConfig,
    registry: &dyn MetricsRegistry,
    logger: &dyn Logger,
) -> Result<Registration> {
    validate(descriptors)?;

    let collectors = descriptors
        .iter()
        .map(|descriptor| build(descriptor, config))
        .collect::<Result<Vec<Collector>>>()?;
    // Clones share cells with the copies registered below.
    let metrics = assemble(descriptors, collectors.clone())?;

    let binder = Binder::new(registry, logger);
    let mut failures = Vec::new();
    for collector in &collectors {
        match binder.bind(collector) {
            Ok(()) => debug!(metric = collector.fq_name(), "registered metric"),
            Err(err) => failures.push(err),
        }
    }

    info!(
        registered = descriptors.len() - failures.len(),
        failed = failures.len(),
        "producer metrics ready"
    );

    Ok(Registration { metrics, failures })
}
